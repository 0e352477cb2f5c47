#[actix_web::main]
async fn main() -> std::io::Result<()> {
    gym_invoice_server::run().await
}
