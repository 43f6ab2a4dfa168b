use std::fmt;

/// The metrics a report is charted for. Codes are matched exactly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Metric {
    UpSpeed,
    DownSpeed,
    UpProportion,
    DownProportion,
    TxPower,
    RxPower,
}

impl Metric {
    /// Every known metric, in archive order.
    pub const ALL: [Metric; 6] = [
        Metric::UpSpeed,
        Metric::DownSpeed,
        Metric::UpProportion,
        Metric::DownProportion,
        Metric::TxPower,
        Metric::RxPower,
    ];

    /// The code as it appears in the report's Code column.
    pub fn code(self) -> &'static str {
        match self {
            Metric::UpSpeed => "UP Speed",
            Metric::DownSpeed => "Down Speed",
            Metric::UpProportion => "UP Proportion",
            Metric::DownProportion => "Down Proportion",
            Metric::TxPower => "Tx_power",
            Metric::RxPower => "Rx_power",
        }
    }

    pub fn from_code(code: &str) -> Option<Metric> {
        Metric::ALL.into_iter().find(|m| m.code() == code)
    }

    /// Archive entry name: spaces become underscores.
    pub fn file_name(self) -> String {
        format!("{}.jpeg", self.code().replace(' ', "_"))
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}
