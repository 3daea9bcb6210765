use std::error::Error;

fn main() -> Result<(), Box<dyn Error>> {
    switchboard::cli::main()
}
