use config::Config;
use event_handler::ResizeHandler;
use lambda_runtime::{service_fn, Error};

mod config;
mod error;
mod event_handler;
mod resize;

#[tokio::main]
async fn main() -> Result<(), Error> {
    let config = Config::from_env()?;
    shared::log::init(config.log_format);

    let aws_config = aws_config::load_from_env().await;
    let s3 = aws_sdk_s3::Client::new(&aws_config);
    let handler = ResizeHandler::new(&s3, config);

    lambda_runtime::run(service_fn(|event| handler.handle(event))).await?;
    Ok(())
}
