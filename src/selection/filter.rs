use crate::selection::event::SelectionEvent;
use crate::settings::{FilterConfig, FilterMode, TriggerMode};

/// Decide whether a selection should be considered for the toolbar at all.
///
/// Only the automatic `selected` trigger is filtered here; the other modes
/// are gated by the gesture detector or the host shortcut before an event
/// ever reaches this point.
pub fn accept(event: &SelectionEvent, config: &FilterConfig) -> bool {
    if config.trigger_mode != TriggerMode::Selected {
        return true;
    }

    let program = event.program_name.as_str();
    if !program.is_empty() && config.blacklist.contains(program) {
        return false;
    }

    if config.filter_list.is_empty() {
        return true;
    }

    let listed = config
        .filter_list
        .iter()
        .any(|entry| program.contains(entry.as_str()));
    match config.filter_mode {
        FilterMode::Whitelist => listed,
        FilterMode::Blacklist => !listed,
    }
}
