#[actix_web::main]
async fn main() -> std::io::Result<()> {
    lunar_dashboard_lib::run().await
}
