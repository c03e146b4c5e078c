//! Toast card CSS: layout, severity accents, lifespan bar, markup elements.

use toastline_core::Config;

use crate::styles::severity;

/// Severity classes paired with the variable carrying their accent color.
const SEVERITIES: [(&str, &str); 5] = [
    (severity::SUCCESS, "--tl-success"),
    (severity::INFO, "--tl-info"),
    (severity::ERROR, "--tl-error"),
    (severity::WARNING, "--tl-warning"),
    (severity::MESSAGE, "--tl-message"),
];

/// Return toast CSS for the loaded config.
pub fn css(config: &Config) -> String {
    let min_width = config.toast.min_width;

    let mut out = format!(
        r#"
/* ===== TOAST CARDS ===== */

.tl-toast {{
    min-width: {min_width}px;
    padding: 12px 14px 8px 14px;
    border-radius: var(--tl-radius);
    background-color: var(--tl-background);
    border: 1px solid var(--tl-border);
    box-shadow: 0 4px 12px var(--tl-shadow);
    color: var(--tl-foreground);
    font-size: var(--tl-font-size);
}}

.tl-toast.tl-clickable:hover {{
    border-color: var(--tl-foreground-faint);
}}

.tl-toast-title {{
    font-size: var(--tl-font-size-lg);
    font-weight: 700;
}}

.tl-toast-text {{
    color: var(--tl-foreground-muted);
}}

.tl-toast-close {{
    min-width: 24px;
    min-height: 24px;
    padding: 0;
    opacity: 0.7;
    border-radius: var(--tl-radius);
    background: transparent;
}}

.tl-toast-close:hover {{
    opacity: 1;
    background: var(--tl-track);
}}

.tl-toast-button {{
    font-size: var(--tl-font-size-sm);
    padding: 4px 8px;
    min-height: 0;
    border-radius: var(--tl-radius);
    background: var(--tl-track);
    color: var(--tl-foreground);
}}

.tl-toast-button:hover {{
    background: var(--tl-foreground-faint);
}}

.tl-toast-image {{
    margin-bottom: 4px;
}}

/* Lifespan countdown bar */
progressbar.tl-lifespan {{
    min-height: 3px;
    margin-top: 6px;
}}

progressbar.tl-lifespan trough {{
    min-height: 3px;
    border-radius: 2px;
    background-color: var(--tl-track);
}}

progressbar.tl-lifespan progress {{
    min-height: 3px;
    border-radius: 2px;
    background-color: var(--tl-message);
}}

.tl-toast.tl-paused progressbar.tl-lifespan {{
    opacity: 0.5;
}}

/* ===== MARKUP ELEMENTS ===== */

.tl-header {{
    font-weight: 700;
    margin-top: 2px;
}}

.tl-h1 {{
    font-size: var(--tl-font-size-lg);
}}

.tl-h2 {{
    font-size: var(--tl-font-size);
}}

.tl-h3 {{
    font-size: var(--tl-font-size-sm);
}}

separator.tl-separator {{
    min-height: 1px;
    margin: 4px 0;
    background-color: var(--tl-border);
}}
"#
    );

    // Severity accent stripe plus matching lifespan fill.
    for (class, var) in SEVERITIES {
        out.push_str(&format!(
            r#"
.tl-toast.{class} {{
    border-left: 3px solid var({var});
}}

.tl-toast.{class} .tl-toast-title {{
    color: var({var});
}}

.tl-toast.{class} progressbar.tl-lifespan progress {{
    background-color: var({var});
}}
"#
        ));
    }

    out
}
