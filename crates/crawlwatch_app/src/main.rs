mod args;
mod platform;

use clap::Parser;

use args::Args;

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    platform::run_app(args)
}
