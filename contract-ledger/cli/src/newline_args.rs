#[derive(clap::Args, Debug)]
pub struct NewlineArgs {
    /// Do not print a newline after the output.
    #[arg(name = "no-newline", short = 'n', long)]
    pub no_newline: bool,
}

impl NewlineArgs {
    pub fn print_newline_if_necessary(&self, writer: &mut dyn std::io::Write) -> std::io::Result<()> {
        if !self.no_newline {
            writer.write_all(b"\n")?;
        }
        Ok(())
    }
}
