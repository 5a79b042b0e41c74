use std::env;
use std::process;
use tracing::error;
use tracing_subscriber::{EnvFilter, FmtSubscriber};
use vsm_text::Pipeline;

// usage: vsm_text <config.json>
// the json selects the task (context, docterm, knn, split) and its parameters

fn main() {

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = FmtSubscriber::builder().with_env_filter(filter).finish();
    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("could not install logger: {}", e);
    }

    let args: Vec<String> = env::args().collect();
    if let Err(e) = Pipeline::run(&args) {
        error!("{}", e);
        process::exit(1);
    }
}
