use serde::Serialize;

/// 路段计算失败时填入的分钟数，代表"代价很高"而不是"未知"
pub const FAILED_CELL_MINUTES: u32 = 999;

/// N×N 行驶时间矩阵（分钟），对角线恒为 0
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TimeMatrix {
    cells: Vec<Vec<u32>>,
}

impl TimeMatrix {
    /// 创建全零矩阵
    pub fn zeros(size: usize) -> Self {
        Self {
            cells: vec![vec![0; size]; size],
        }
    }

    pub fn size(&self) -> usize {
        self.cells.len()
    }

    pub fn get(&self, from: usize, to: usize) -> u32 {
        self.cells[from][to]
    }

    /// 设置非对角线单元格，对角线写入会被忽略
    pub fn set(&mut self, from: usize, to: usize, minutes: u32) {
        if from != to {
            self.cells[from][to] = minutes;
        }
    }

    pub fn rows(&self) -> &[Vec<u32>] {
        &self.cells
    }

    /// 被哨兵值填充的单元格数量
    pub fn failed_cells(&self) -> usize {
        self.cells
            .iter()
            .enumerate()
            .flat_map(|(i, row)| row.iter().enumerate().map(move |(j, v)| (i, j, *v)))
            .filter(|(i, j, v)| i != j && *v == FAILED_CELL_MINUTES)
            .count()
    }
}

/// 秒转整分钟（四舍五入）
pub fn seconds_to_minutes(seconds: f64) -> u32 {
    if !seconds.is_finite() || seconds <= 0.0 {
        return 0;
    }
    (seconds / 60.0).round() as u32
}
