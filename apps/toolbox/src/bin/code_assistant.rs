use llm::OllamaClient;
use std::process::ExitCode;
use toolbox::{
    assistant::{self, Command, EXIT_FAILURE, USAGE},
    config::AssistantConfig,
};

#[tokio::main]
async fn main() -> ExitCode {
    analytics_tracing::init_tracing_to_stderr("warn");

    let args = match assistant::parse_args(std::env::args_os().skip(1)) {
        Ok(Command::Run(args)) => args,
        Ok(Command::Help) => {
            println!("{}", USAGE);
            return ExitCode::SUCCESS;
        }
        Err(e) => {
            eprintln!("{}\ncode-assistant: error: {}", USAGE, e);
            return ExitCode::from(assistant::exit_code(&e.into()));
        }
    };

    let config = match AssistantConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::from(EXIT_FAILURE);
        }
    };
    tracing::debug!("config: {:?}", config);

    let client = match OllamaClient::new(config.ollama) {
        Ok(client) => client,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::from(EXIT_FAILURE);
        }
    };

    let mut stdout = std::io::stdout();
    let mut stderr = std::io::stderr();
    match assistant::run(&args, &client, &config.output_dir, &mut stdout, &mut stderr).await {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::from(assistant::exit_code(&e))
        }
    }
}
