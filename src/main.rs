use std::error::Error;

fn main() -> Result<(), Box<dyn Error>> {
    outfitmatch::cli::main()
}
