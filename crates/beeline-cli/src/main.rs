use anyhow::Result;
use beeline_cli::{main_inner, Args};
use clap::Parser;

fn main() -> Result<()> {
    tracing_subscriber::fmt::init();
    main_inner(Args::parse())
}
