#![allow(missing_docs)]

use std::path::PathBuf;

use clap::{Parser, Subcommand};

mod cmd;

#[derive(Parser)]
#[command(name = "setblob", about = "Settings-defaults blob generator")]
struct Cli {
	#[command(subcommand)]
	command: Commands,
}

#[derive(Subcommand)]
enum Commands {
	Info {
		manifest: PathBuf,
	},
	Dump {
		manifest: PathBuf,
		#[arg(long)]
		json: bool,
	},
	Blob {
		manifest: PathBuf,
		#[arg(long, short = 'o')]
		out: PathBuf,
	},
	Version {
		version: String,
	},
}

fn main() {
	if let Err(err) = run() {
		eprintln!("error: {err}");
		std::process::exit(1);
	}
}

fn run() -> setblob::blob::Result<()> {
	let cli = Cli::parse();

	match cli.command {
		Commands::Info { manifest } => cmd::info::run(manifest),
		Commands::Dump { manifest, json } => cmd::dump::run(manifest, json),
		Commands::Blob { manifest, out } => cmd::blob::run(manifest, out),
		Commands::Version { version } => cmd::version::run(&version),
	}
}
