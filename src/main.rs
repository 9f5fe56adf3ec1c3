use anyhow::Result;
use clap::Parser;
use imaginai::ai::GeminiImageClient;
use imaginai::config::Config;
use imaginai::download::ImageDownloader;
use imaginai::generator::DEFAULT_IMAGE_COUNT;
use imaginai::ImageGenerator;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Debug, Parser)]
#[command(name = "imaginai")]
#[command(about = "Turn a topic into AI-generated images")]
struct CliArgs {
    /// Topic to illustrate; multiple words are joined with spaces.
    #[arg(value_name = "TOPIC", required = true)]
    topic: Vec<String>,

    /// Number of images to generate.
    #[arg(short = 'n', long, default_value_t = DEFAULT_IMAGE_COUNT as u8,
          value_parser = clap::value_parser!(u8).range(1..=8))]
    count: u8,

    /// Directory downloaded images are written to.
    #[arg(short, long, default_value = "output")]
    output: PathBuf,

    /// Image model to use instead of the configured one.
    #[arg(long)]
    model: Option<String>,

    /// Print data URIs instead of saving files.
    #[arg(long)]
    no_save: bool,
}

impl CliArgs {
    fn prompt(&self) -> String {
        self.topic.join(" ")
    }
}

async fn run(args: CliArgs) -> imaginai::Result<()> {
    let mut config = Config::from_env()?;
    if let Some(model) = &args.model {
        config.image_model = model.clone();
    }
    info!("Image provider: Gemini (model: {})", config.image_model);

    let backend = GeminiImageClient::new_with_client(
        config.api_key,
        config.image_model,
        config.request_timeout,
        reqwest::Client::new(),
    )
    .with_base_url(config.base_url);
    let generator = ImageGenerator::new(Arc::new(backend));

    let images = generator
        .generate(&args.prompt(), usize::from(args.count))
        .await?;

    if args.no_save {
        for image in &images {
            println!("{}", image.data_uri());
        }
        return Ok(());
    }

    let downloader = ImageDownloader::new(&args.output);
    for path in downloader.save_all_now(&images).await? {
        println!("{}", path.display());
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "imaginai=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args = CliArgs::parse();

    match run(args).await {
        Ok(()) => {
            info!("Generation completed successfully");
            Ok(())
        }
        Err(e) => {
            error!("Failed to generate images: {}", e);
            std::process::exit(1);
        }
    }
}
