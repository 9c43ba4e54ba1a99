fn main() -> anyhow::Result<()> {
    noteline::cli::run()
}
