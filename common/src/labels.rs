//! Fixed code → category tables for the two efficiency classifiers.

use serde::{Deserialize, Serialize};

pub const UNKNOWN_LABEL: &str = "Label Tidak Dikenal";

const TERMINAL_LABELS: [(i64, &str); 3] = [
    (0, "Boros"),
    (1, "Layanan Tidak Maksimal"),
    (2, "Normal"),
];

const KANTOR_LABELS: [(i64, &str); 3] = [(0, "Boros"), (1, "Efisien"), (2, "Normal")];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Area {
    Terminal,
    Kantor,
}

impl Area {
    fn table(self) -> &'static [(i64, &'static str)] {
        match self {
            Area::Terminal => &TERMINAL_LABELS,
            Area::Kantor => &KANTOR_LABELS,
        }
    }

    /// Decode a classifier code; codes outside the table map to [`UNKNOWN_LABEL`].
    pub fn decode(self, code: i64) -> &'static str {
        self.table()
            .iter()
            .find(|(c, _)| *c == code)
            .map(|(_, label)| *label)
            .unwrap_or(UNKNOWN_LABEL)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_known_codes() {
        assert_eq!(Area::Terminal.decode(0), "Boros");
        assert_eq!(Area::Terminal.decode(1), "Layanan Tidak Maksimal");
        assert_eq!(Area::Terminal.decode(2), "Normal");
        assert_eq!(Area::Kantor.decode(0), "Boros");
        assert_eq!(Area::Kantor.decode(1), "Efisien");
        assert_eq!(Area::Kantor.decode(2), "Normal");
    }

    #[test]
    fn test_decode_is_total() {
        for area in [Area::Terminal, Area::Kantor] {
            for code in 0..3 {
                assert!(!area.decode(code).is_empty());
                assert_ne!(area.decode(code), UNKNOWN_LABEL);
            }
            for code in [-1, 3, 42, i64::MIN, i64::MAX] {
                assert_eq!(area.decode(code), UNKNOWN_LABEL);
            }
        }
    }
}
