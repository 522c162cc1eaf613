pub struct HealthController {}

impl HealthController {
    pub async fn get() -> &'static str {
        "OK"
    }
}
