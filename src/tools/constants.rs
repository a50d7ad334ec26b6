//! 常量和默认配置集中管理
//!
//! 将所有重要常量集中定义，避免"默认值漂移"和重复定义

/// 默认分析参数
pub mod defaults {
    /// 默认直方图bin数量
    pub const HISTOGRAM_BINS: usize = 30;

    /// 默认KDE求值点数量
    pub const GRID_SIZE: usize = 200;

    /// 默认支撑区间延伸倍数（核宽度的倍数）
    pub const KDE_CUT: f64 = 3.0;

    /// 默认百分比区间（峰值的±10%）
    pub const MARGIN_PERCENT: f64 = 10.0;

    /// 默认标准差倍数
    pub const MARGIN_NUM_STD: f64 = 1.0;

    /// 默认数据列名（仅用于报告展示）
    pub const AMPLITUDE_COLUMN: &str = "Peak Amplitude (nA)";

    /// 默认并发度（1 = 串行）
    pub const JOBS: usize = 1;
}

/// 并发度限制常量
pub mod parallel_limits {
    /// 最小并发度
    pub const MIN_PARALLEL_DEGREE: usize = 1;

    /// 最大并发度
    ///
    /// 数据集级计算量很小，超过16个线程只会增加调度开销
    pub const MAX_PARALLEL_DEGREE: usize = 16;
}

/// 批量模式扫描的输入文件扩展名
pub const INPUT_EXTENSIONS: &[&str] = &["json"];
