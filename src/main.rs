//! rTimeTracker main entrypoint.

use rtimetracker::run;
use rtimetracker::ui::messages::error;

fn main() {
    if let Err(e) = run() {
        error(format!("Error: {}", e));
        std::process::exit(1);
    }
}
