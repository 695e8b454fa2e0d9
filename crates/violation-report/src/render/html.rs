//! HTML report: one self-contained page, inline CSS and a single
//! `toggleStack` script for the collapsible thread panels.

use monitor_log::parser::{ExclusionSet, FieldRef, MonitorLog, ThreadTrace, Violation};

const STYLE: &str = r#"
        body { font-family: Arial, sans-serif; margin: 20px; background-color: #f5f5f5; }
        h1 { color: #333; }
        h3 { margin-top: 0; }
        .excluded-section, .ignored-section, .summary {
            background-color: #fff; border-radius: 5px; padding: 15px; margin-bottom: 20px;
            box-shadow: 0 2px 4px rgba(0, 0, 0, 0.1);
        }
        .excluded-title, .ignored-title { font-weight: bold; margin: 10px 0 5px; color: #555; }
        .excluded-item, .ignored-item { font-family: monospace; margin-left: 20px; color: #666; }
        .empty { margin-left: 20px; color: #999; font-style: italic; }
        .violation {
            background-color: #fff; border-left: 4px solid #e74c3c; border-radius: 5px;
            padding: 15px; margin-bottom: 15px; box-shadow: 0 2px 4px rgba(0, 0, 0, 0.1);
        }
        .variable { font-weight: bold; color: #e74c3c; margin-bottom: 10px; }
        .thread-info { margin: 10px 0; }
        .thread-name { cursor: pointer; color: #2c3e50; font-weight: bold; user-select: none; }
        .thread-name::before { content: '\25B6  '; font-size: 0.8em; }
        .thread-name.expanded::before { content: '\25BC  '; }
        .stack-trace {
            display: none; margin: 5px 0 0 20px; padding: 10px; background-color: #f8f9fa;
            border-radius: 3px; font-family: monospace; font-size: 0.9em;
        }
        .location { color: #34495e; padding: 2px 0; }
        .omitted { color: #999; font-style: italic; padding: 2px 0; }
"#;

const SCRIPT: &str = r#"
        function toggleStack(element) {
            const stackTrace = element.nextElementSibling;
            const isExpanded = element.classList.toggle('expanded');
            stackTrace.style.display = isExpanded ? 'block' : 'none';
        }
"#;

/// Render the full report page for a parsed monitor log.
pub fn render_report(log: &MonitorLog, title: &str) -> String {
    let title = html_escape(title);
    let mut html = String::with_capacity(4096 + log.violations.len() * 1024);

    html.push_str(&format!(
        r#"<!DOCTYPE html>
<html>
<head>
    <meta charset="utf-8">
    <title>{title}</title>
    <style>{STYLE}    </style>
    <script>{SCRIPT}    </script>
</head>
<body>
    <h1>{title}</h1>
"#
    ));

    html.push_str(&render_exclusions(&log.exclusions));
    html.push_str(&render_ignored_static_inits(&log.ignored_static_inits));

    html.push_str(&format!(
        r#"    <div class="summary">
        <h3>Violations Summary</h3>
        <p>Total violations found: {}</p>
    </div>
"#,
        log.violations.len()
    ));

    for violation in &log.violations {
        html.push_str(&render_violation(violation));
    }

    html.push_str("</body>\n</html>\n");
    html
}

fn render_exclusions(exclusions: &ExclusionSet) -> String {
    let mut section = String::from(
        r#"    <div class="excluded-section">
        <h3>Items Excluded by @RsmThreadSafe</h3>
"#,
    );

    let classes: Vec<String> = exclusions.classes.iter().map(|c| html_escape(c)).collect();
    let methods: Vec<String> = exclusions
        .methods
        .iter()
        .map(|m| html_escape(&format!("{}.{}", m.class, m.method)))
        .collect();
    let fields: Vec<String> = exclusions.fields.iter().map(field_label).collect();

    section.push_str(&render_item_list("excluded", "Excluded Classes:", &classes));
    section.push_str(&render_item_list("excluded", "Excluded Methods:", &methods));
    section.push_str(&render_item_list("excluded", "Excluded Fields:", &fields));
    section.push_str("    </div>\n");
    section
}

fn render_ignored_static_inits(fields: &[FieldRef]) -> String {
    let items: Vec<String> = fields.iter().map(field_label).collect();

    let mut section = String::from(
        r#"    <div class="ignored-section">
        <h3>Items Excluded by @IgnoreStaticInit</h3>
"#,
    );
    section.push_str(&render_item_list(
        "ignored",
        "Fields ignoring static initialization writes:",
        &items,
    ));
    section.push_str("    </div>\n");
    section
}

/// `items` must already be escaped.
fn render_item_list(kind: &str, heading: &str, items: &[String]) -> String {
    let mut out = format!("        <div class=\"{kind}-title\">{heading}</div>\n");
    if items.is_empty() {
        out.push_str("        <div class=\"empty\">None</div>\n");
    }
    for item in items {
        out.push_str(&format!("        <div class=\"{kind}-item\">{item}</div>\n"));
    }
    out
}

fn field_label(field: &FieldRef) -> String {
    html_escape(&format!("{}.{}", field.class, field.field))
}

fn render_violation(violation: &Violation) -> String {
    let mut block = format!(
        "    <div class=\"violation\">\n        <div class=\"variable\">Variable: {}</div>\n",
        html_escape(&violation.variable)
    );
    block.push_str(&render_thread_panel("RSM Thread", &violation.core_thread));
    block.push_str(&render_thread_panel("Non-RSM Thread", &violation.non_core_thread));
    block.push_str("    </div>\n");
    block
}

fn render_thread_panel(label: &str, trace: &ThreadTrace) -> String {
    let mut panel = format!(
        r#"        <div class="thread-info">
            <div class="thread-name" onclick="toggleStack(this)">{label}: {}</div>
            <div class="stack-trace">
"#,
        html_escape(&trace.thread_name)
    );

    for frame in &trace.frames {
        panel.push_str(&format!(
            "                <div class=\"location\">at {}.{}({}:line {})</div>\n",
            html_escape(&frame.class),
            html_escape(&frame.method),
            html_escape(&frame.file),
            frame.line
        ));
    }
    if trace.omitted_frames > 0 {
        panel.push_str(&format!(
            "                <div class=\"omitted\">... {} more frames omitted</div>\n",
            trace.omitted_frames
        ));
    }

    panel.push_str("            </div>\n        </div>\n");
    panel
}

fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}
