/// server clock, unix millis
pub fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

/// fresh record id
pub fn gen_id() -> String {
    nanoid::nanoid!()
}
