/// Liveness probe. Does not touch the store.
pub async fn healthz() -> &'static str {
    "OK"
}
