mod attempt_vm;
mod palette_vm;
mod practice_vm;
mod result_vm;
mod time_fmt;

pub use attempt_vm::{AttemptIntent, AttemptVm, start_attempt};
pub use palette_vm::{indicator_class, live_legend_rows, solution_legend_rows};
pub use practice_vm::{PracticeIntent, PracticeVm, practice_status_class, start_practice};
pub use result_vm::{ResultHeaderVm, map_result_header, solution_palette};
pub use time_fmt::format_clock;
