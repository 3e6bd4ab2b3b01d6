use dioxus::prelude::*;

use crate::ui::form::{FieldContext, FieldKind, FormField, FormState};
use crate::ui::styles::{button_style, modal_backdrop_style, modal_panel_style};

const INPUT_STYLE: &str = "width: 100%; padding: 6px 8px; box-sizing: border-box;";

fn render_field(
    field: &FormField,
    state: &FormState,
    disabled: bool,
    on_change: EventHandler<(&'static str, String)>,
    on_blur: EventHandler<&'static str>,
    on_browse: EventHandler<(&'static str, &'static str)>,
) -> Element {
    let name = field.name;
    let value = state.value(name).to_string();
    let placeholder = field.placeholder.unwrap_or("");

    match &field.kind {
        FieldKind::Text | FieldKind::Number | FieldKind::Date => {
            let input_type = match field.kind {
                FieldKind::Number => "number",
                FieldKind::Date => "date",
                _ => "text",
            };
            rsx! {
                input {
                    r#type: "{input_type}",
                    style: INPUT_STYLE,
                    value: "{value}",
                    placeholder: "{placeholder}",
                    disabled: disabled,
                    oninput: move |event| on_change.call((name, event.value())),
                    onblur: move |_| on_blur.call(name),
                }
            }
        }
        FieldKind::Textarea => rsx! {
            textarea {
                style: "{INPUT_STYLE} min-height: 72px;",
                value: "{value}",
                placeholder: "{placeholder}",
                disabled: disabled,
                oninput: move |event| on_change.call((name, event.value())),
                onblur: move |_| on_blur.call(name),
            }
        },
        FieldKind::Select(options) => rsx! {
            select {
                style: INPUT_STYLE,
                value: "{value}",
                disabled: disabled,
                onchange: move |event| {
                    on_change.call((name, event.value()));
                    on_blur.call(name);
                },
                option { value: "", selected: value.is_empty(), "(none)" }
                for option in options.iter().cloned() {
                    option {
                        key: "{option.value}",
                        value: "{option.value}",
                        selected: option.value == value,
                        "{option.label}"
                    }
                }
            }
        },
        FieldKind::Checkbox => {
            let checked = value == "true";
            rsx! {
                input {
                    r#type: "checkbox",
                    checked: checked,
                    disabled: disabled,
                    onclick: move |_| {
                        let next = if checked { "false" } else { "true" };
                        on_change.call((name, next.to_string()));
                        on_blur.call(name);
                    },
                }
            }
        }
        FieldKind::File { accept } => {
            let accept = *accept;
            rsx! {
                div { style: "display: flex; gap: 6px;",
                    input {
                        r#type: "text",
                        style: INPUT_STYLE,
                        value: "{value}",
                        placeholder: "{placeholder}",
                        disabled: disabled,
                        oninput: move |event| on_change.call((name, event.value())),
                        onblur: move |_| on_blur.call(name),
                    }
                    button {
                        style: "{button_style(false)}",
                        disabled: disabled,
                        onclick: move |_| on_browse.call((name, accept)),
                        "Browse…"
                    }
                }
            }
        }
        FieldKind::Custom(render) => {
            let context = FieldContext {
                name,
                label: field.label,
                value,
                error: state.error(name).map(str::to_string),
                disabled,
                on_change: EventHandler::new(move |next: String| on_change.call((name, next))),
            };
            render.render(&context)
        }
    }
}

#[component]
pub fn FormDialog(
    title: String,
    fields: Vec<FormField>,
    state: FormState,
    submitting: bool,
    on_change: EventHandler<(&'static str, String)>,
    on_blur: EventHandler<&'static str>,
    on_browse: EventHandler<(&'static str, &'static str)>,
    on_submit: EventHandler<()>,
    on_cancel: EventHandler<()>,
) -> Element {
    let blocked = submitting || state.has_errors();

    rsx! {
        div { style: "{modal_backdrop_style()}",
            div {
                style: "{modal_panel_style()}",
                onclick: move |event| event.stop_propagation(),
                h3 { style: "margin-top: 0;", "{title}" }
                {fields.iter().map(|field| {
                    let name = field.name;
                    let label = field.label;
                    let marker = if field.required { " *" } else { "" };
                    let error = state.error(name).map(str::to_string);
                    let control = render_field(field, &state, submitting, on_change, on_blur, on_browse);
                    rsx!(
                        div { key: "{name}", style: "margin-bottom: 10px;",
                            label { style: "display: block; font-weight: 600; margin-bottom: 4px;", "{label}{marker}" }
                            {control}
                            if let Some(error) = error {
                                div { style: "color: #b42318; font-size: 12px; margin-top: 2px;", "{error}" }
                            }
                        }
                    )
                })}
                div { style: "display: flex; justify-content: flex-end; gap: 8px; margin-top: 12px;",
                    button {
                        style: "{button_style(false)}",
                        disabled: submitting,
                        onclick: move |_| on_cancel.call(()),
                        "Cancel"
                    }
                    button {
                        style: "{button_style(true)}",
                        disabled: blocked,
                        onclick: move |_| on_submit.call(()),
                        if submitting { "Saving…" } else { "Save" }
                    }
                }
            }
        }
    }
}
