mod cli;
mod commands;
mod infra;

use rcos_portal::error::AppError;

pub fn run() -> Result<(), AppError> {
    cli::run()
}
