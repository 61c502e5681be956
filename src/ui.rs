use crate::errors::{AppError, AppResult};
use indicatif::{ProgressBar, ProgressStyle};

/// Creates the bar for the month-by-month feed walk.
///
/// `total` is the number of periods to probe. Callers tick once per period and
/// set the message to the `YYYYMM` token being processed, then finish with the
/// merged tender count. Drawing goes to stderr, so it never mixes with log lines
/// redirected to a file.
///
/// # Example
///
/// ```no_run
/// use placsp_sync::ui;
///
/// # fn main() -> Result<(), placsp_sync::errors::AppError> {
/// let pb = ui::create_progress_bar(166)?;
/// pb.set_message("202401");
/// pb.inc(1);
/// pb.finish_with_message("Merged 0 tender(s)");
/// # Ok(())
/// # }
/// ```
pub fn create_progress_bar(total: u64) -> AppResult<ProgressBar> {
    let pb = ProgressBar::new(total);
    pb.set_style(
        ProgressStyle::default_bar()
            .template(
                "{spinner:.green} [{elapsed_precise}] [{wide_bar:.cyan/blue}] {pos}/{len} periods {msg}",
            )
            .map_err(|e| AppError::IoError(format!("Failed to create progress bar template: {e}")))?
            .progress_chars("#>-"),
    );
    Ok(pb)
}
