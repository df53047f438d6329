use crate::menu::MenuState;
use crate::render::capability::RenderCapability;

/// Turn a menu state into the ordered lines of one frame. Pure: identical
/// inputs always produce an identical line list, no I/O anywhere. All
/// positioning and clearing belongs to the renderer; these are plain text.
pub fn compose(state: &MenuState, caps: &RenderCapability) -> Vec<String> {
    let mut lines = Vec::new();

    if caps.compact {
        lines.push(state.title.clone());
    } else {
        lines.push(format!("== {} ==", state.title));
        lines.push(String::new());
    }

    if !state.aux_lines.is_empty() {
        if caps.compact {
            // Collapse runs of blank lines to keep constrained hosts tight.
            let mut last_blank = false;
            for line in &state.aux_lines {
                let blank = line.trim().is_empty();
                if blank && last_blank {
                    continue;
                }
                lines.push(line.clone());
                last_blank = blank;
            }
        } else {
            lines.extend(state.aux_lines.iter().cloned());
            lines.push(String::new());
        }
    }

    for (i, item) in state.items.iter().enumerate() {
        let cursor = if i == state.cursor { "> " } else { "  " };
        let mark = if state.multi_select {
            if state.selected.contains(&i) {
                "[x] "
            } else {
                "[ ] "
            }
        } else {
            ""
        };
        let suffix = if item.enabled { "" } else { "  (unavailable)" };
        lines.push(format!("{cursor}{mark}{:>2}. {}{suffix}", i + 1, item.label));
    }

    if let Some(current) = state.current() {
        if !current.description.is_empty() {
            if !caps.compact {
                lines.push(String::new());
            }
            lines.push(format!("  {}", current.description));
        }
    }

    lines.push(legend(state));
    lines
}

/// Read-only detail frame for the Info action.
pub fn compose_info(state: &MenuState, caps: &RenderCapability) -> Vec<String> {
    let mut lines = Vec::new();
    let Some(item) = state.current() else {
        return lines;
    };

    if caps.compact {
        lines.push(item.label.clone());
    } else {
        lines.push(format!("== {} ==", item.label));
        lines.push(String::new());
    }

    if item.description.is_empty() {
        lines.push("(no description)".to_string());
    } else {
        lines.push(item.description.clone());
    }
    if let Some(value) = item.value() {
        lines.push(format!("value: {value}"));
    }
    if !item.enabled {
        lines.push("currently unavailable".to_string());
    }

    if !caps.compact {
        lines.push(String::new());
    }
    lines.push("[any key] back".to_string());
    lines
}

/// One-line cursor summary for the minimal-diff tier.
pub fn compose_move_summary(state: &MenuState) -> String {
    match state.current() {
        Some(item) => {
            let mark = if state.multi_select && state.selected.contains(&state.cursor) {
                "[x] "
            } else {
                ""
            };
            format!("> {mark}{} ({}/{})", item.label, state.cursor + 1, state.len())
        }
        None => String::new(),
    }
}

fn legend(state: &MenuState) -> String {
    let mut parts: Vec<String> = vec!["[up/dn] move".to_string()];
    if state.multi_select {
        let count = if state.max_selections != 0 {
            format!("{}/{}", state.selected.len(), state.max_selections)
        } else {
            state.selected.len().to_string()
        };
        parts.push(format!("[space] toggle ({count})"));
        parts.push("[enter] commit".to_string());
    } else {
        parts.push("[enter] select".to_string());
    }
    parts.push("[i] info".to_string());
    if state.cancellable {
        parts.push("[esc] cancel".to_string());
    }
    parts.join("  ")
}
