#[actix_web::main]
async fn main() -> std::io::Result<()> {
    hipaa_compliance_server::run().await
}
