//! Column names each exported artifact is trained on.
//!
//! The names are part of the artifact contract: a model file whose
//! `feature_names` differ from these lists is rejected at load time.

pub const MONTH: &str = "month";
pub const DAYOFWEEK: &str = "dayofweek";
pub const DAYOFYEAR: &str = "dayofyear";
pub const IS_WORKDAY: &str = "is_hari_kerja";
pub const IS_HOLIDAY: &str = "is_libur";
pub const PAX: &str = "pax";
pub const SUHU_RATA: &str = "suhu_rata";
pub const SUHU_MAX: &str = "suhu_max";
pub const DEVIASI_TERMINAL: &str = "deviasi_persen";
pub const DEVIASI_KANTOR: &str = "deviasi_persen_kantor";
pub const DELTA_KWH: &str = "perubahan_listrik_kwh";
pub const DELTA_PAX: &str = "perubahan_pax";

pub const PAX_FEATURES: &[&str] = &[MONTH, DAYOFWEEK, DAYOFYEAR, IS_WORKDAY, IS_HOLIDAY];
pub const TERMINAL_FEATURES: &[&str] = &[PAX, SUHU_RATA, SUHU_MAX];
pub const KANTOR_FEATURES: &[&str] = &[IS_WORKDAY, SUHU_RATA, SUHU_MAX];
pub const TERMINAL_CLASSIFIER_FEATURES: &[&str] = &[PAX, SUHU_MAX, DEVIASI_TERMINAL];
pub const KANTOR_CLASSIFIER_FEATURES: &[&str] = &[IS_WORKDAY, SUHU_MAX, DEVIASI_KANTOR];
pub const USAGE_CLASSIFIER_FEATURES: &[&str] = &[DELTA_KWH, DELTA_PAX];
