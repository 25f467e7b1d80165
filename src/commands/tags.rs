// Tags command - print the decorator table, the contract for error renderers

use anyhow::Result;

use crate::report::{ErrorDecorator, Palette};

pub fn handle_tags(use_colors: bool) -> Result<()> {
    let decorator = ErrorDecorator::new(&Palette::new(use_colors));

    for tag in decorator.tags() {
        let sample = decorator.decorate(tag, "sample").unwrap_or_default();
        println!("{:<26} {}", tag, sample.replace('\n', "\\n"));
    }

    Ok(())
}
