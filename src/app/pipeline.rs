//! Ordered validation and execution of provisioning blocks.

use crate::app::blocks::Block;
use crate::domain::{AppError, BlockErrors};
use crate::ports::{Transport, Ui};

/// Validate every block, reporting all failures at once.
pub fn validate_all(blocks: &mut [&mut dyn Block]) -> Result<(), AppError> {
    let mut errors = BlockErrors::default();
    for block in blocks.iter_mut() {
        if let Err(err) = block.validate() {
            errors.push(block.name(), err);
        }
    }
    errors.into_result()
}

/// Run blocks in order, stopping at the first failure.
///
/// Blocks that already finished are not undone.
pub fn run_all(
    blocks: &[&dyn Block],
    transport: &dyn Transport,
    ui: &mut dyn Ui,
) -> Result<(), AppError> {
    for &block in blocks {
        ui.say(&format!("Start execution of \"{}\" ...", block.name()));

        if let Err(err) = execute(block, transport, ui) {
            ui.error(&format!("{} failed: {}", block.name(), err));
            return Err(AppError::BlockRun {
                block: block.name().to_string(),
                source: Box::new(err),
            });
        }

        ui.say(&format!("Successfully finished \"{}\"", block.name()));
    }
    Ok(())
}

fn execute(block: &dyn Block, transport: &dyn Transport, ui: &mut dyn Ui) -> Result<(), AppError> {
    ui.say(&format!("executing \"{}\"", block.command()?));
    block.run(transport, ui)
}
