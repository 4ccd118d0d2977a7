use clap::Parser;
use devconnect::config::Server as Config;
use devconnect::server::StartServerError;
use error_stack::{Result, ResultExt};
use std::net::IpAddr;
use std::num::NonZeroUsize;

/// Command line options for DevConnect.
#[derive(Debug, Parser)]
#[command(about = "DevConnect backend server", version, author, long_about)]
pub struct Cli {
  #[clap(subcommand)]
  pub subcommand: Subcommand,
}

impl Cli {
  pub fn run(self) -> Result<(), StartServerError> {
    match self.subcommand {
      Subcommand::Server(args) => args.run(),
    }
  }
}

#[derive(Debug, Parser)]
pub enum Subcommand {
  Server(ServerCommand),
}

/// Expose the DevConnect API HTTP server
#[derive(Debug, Parser)]
pub struct ServerCommand {
  #[clap(long)]
  pub address: Option<IpAddr>,
  #[clap(long)]
  pub port: Option<u16>,
  #[clap(long)]
  pub workers: Option<NonZeroUsize>,
}

impl ServerCommand {
  fn run(self) -> Result<(), StartServerError> {
    let mut config = Config::load().change_context(StartServerError)?;
    self.override_config(&mut config);

    devconnect::logging::init(&config.logging).change_context(StartServerError)?;

    tokio::runtime::Builder::new_multi_thread()
      .enable_all()
      .worker_threads(config.workers)
      .build()
      .change_context(StartServerError)
      .attach_printable("could not build tokio runtime")?
      .block_on(devconnect::server::run(config))
  }

  fn override_config(&self, config: &mut Config) {
    // override server configurations if set by the cli
    if let Some(address) = self.address {
      config.ip = address;
    }

    if let Some(port) = self.port {
      config.port = port;
    }

    if let Some(workers) = self.workers {
      config.workers = workers.get();
    }
  }
}
