use clap::Parser;
use color_eyre::eyre::Result;
use rhstor::view::{run, App};

#[tokio::main]
async fn main() -> Result<()> {
    let app = App::parse();

    rhstor::init_logging(app.debug);
    color_eyre::install()?;

    run(app).await
}
