//! Shared resets for the stack windows.

/// Return base CSS. `opacity` is the configured card opacity.
pub fn css(opacity: f64) -> String {
    format!(
        r#"
/* ===== BASE ===== */

/* Stack windows are invisible containers; only the cards paint. */
window.tl-toast-stack {{
    background: transparent;
}}

.tl-toast-column {{
    background: transparent;
}}

.tl-toast {{
    opacity: {opacity:.3};
}}

/* Links inside body text pick up the info accent. */
.tl-toast-text link,
.tl-toast-text link:visited {{
    color: var(--tl-info);
}}
"#
    )
}
