fn main() -> anyhow::Result<()> {
    cantor::runtime::run()
}
