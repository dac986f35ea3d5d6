use clap::Parser;

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
	color_eyre::install()?;

	let args = taxon_api::Args::parse();

	taxon_api::run(args).await
}
