use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, Hash, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VoucherType {
    #[default]
    Fixed,
    Percentage,
}

impl VoucherType {
    pub const ALL: [VoucherType; 2] = [VoucherType::Fixed, VoucherType::Percentage];

    pub fn as_str(&self) -> &'static str {
        match self {
            VoucherType::Fixed => "fixed",
            VoucherType::Percentage => "percentage",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.as_str() == value)
    }
}

impl Display for VoucherType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
