/// Health check endpoint handler
/// Returns "OK" with 200 status code
pub async fn health() -> &'static str {
    "OK"
}
