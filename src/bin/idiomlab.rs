use anyhow::Result;

fn main() -> Result<()> {
    idiomlab::cli::run()
}
