use anyhow::Result;

fn main() -> Result<()> {
    stickyboard::cli::run()
}
