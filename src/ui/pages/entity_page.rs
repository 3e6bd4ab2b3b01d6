use std::sync::Arc;

use dioxus::prelude::*;

use crate::domain::entities::catalog::{EntityKind, Lookups};
use crate::domain::entities::table::QueryContext;
use crate::infra::sqlite::entities::SqlEntity;
use crate::platform::desktop::dialogs::{pick_export_file, pick_file, pick_import_file};
use crate::ui::components::confirm_dialog::ConfirmDialog;
use crate::ui::components::data_table::{RowAction, RowControls};
use crate::ui::components::form_dialog::FormDialog;
use crate::ui::components::notice::NoticeBanner;
use crate::ui::components::table_view::{render_data_table, use_data_table};
use crate::ui::form::FormState;
use crate::ui::pages::{create_shop_id, dialog_fields, EntityAdmin};
use crate::ui::state::app_state::{AppServices, AppState};
use crate::ui::styles::button_style;
use crate::ui::table::view::TableOptions;
use crate::usecase::services::edit_service::EditService;
use crate::usecase::services::entity_page::{DialogTarget, EntityPageState, Notice, PageMode};

fn notify(mut page: Signal<EntityPageState>, notice: Notice) {
    page.write().notice = Some(notice);
}

fn current_lookups(lookups: Resource<Result<Lookups, String>>) -> Lookups {
    match &*lookups.read() {
        Some(Ok(loaded)) => loaded.clone(),
        _ => Lookups::default(),
    }
}

/// Generic admin page: server-mode table plus the create / edit / delete /
/// toggle dialogs for one entity.
pub fn entity_page<E: EntityAdmin + SqlEntity>(context: QueryContext) -> Element {
    let services = use_context::<AppServices>();
    let app = use_context::<AppState>();
    let singular = E::KIND.singular();
    let table_key = E::KIND.table_key();

    let mut selected_count = use_signal(|| 0_usize);
    let table = use_data_table(|| {
        let fetcher = Arc::new(services.repo.fetcher::<E>());
        TableOptions::server(E::columns(), fetcher, context)
            .page_size(services.page_size)
            .filterable(E::filterable_columns(&Lookups::default()))
            .row_selection(Some(Box::new(move |rows: &[&E]| {
                selected_count.set(rows.len());
            })))
            .title(E::TITLE)
            .placeholder(E::SEARCH_PLACEHOLDER)
            .persist_as(table_key)
            .debounce_ms(services.debounce_ms)
            .with_row_actions()
    });
    let controller = table.controller;
    let mut page = use_signal(EntityPageState::new);
    let mut form = use_signal(FormState::default);
    let mut importing = use_signal(|| false);
    let edit = use_hook(|| EditService::<E>::new(services.repo.clone()));

    let settings = services.settings.clone();
    let mut lookups = use_resource(move || {
        let settings = settings.clone();
        async move {
            settings
                .lookups(context)
                .await
                .map_err(|err| err.to_string())
        }
    });

    use_effect(move || {
        let filterables = E::filterable_columns(&current_lookups(lookups));
        let mut chrome = table.chrome;
        chrome.write().filterable_columns = filterables;
    });

    let edit_for_rows = edit.clone();
    let on_row_action = use_callback(move |(key, action): (String, RowAction)| {
        let Ok(id) = key.parse::<i64>() else {
            return;
        };
        let row = controller
            .read()
            .page_rows()
            .into_iter()
            .find(|row| row.id() == id)
            .cloned();
        let Some(row) = row else {
            return;
        };
        match action {
            RowAction::Edit => {
                let opened = page.write().open_edit(id);
                if let Err(err) = opened {
                    notify(page, Notice::error(err.to_string()));
                    return;
                }
                let fields = dialog_fields::<E>(
                    &current_lookups(lookups),
                    context,
                    Some(DialogTarget::Edit(id)),
                );
                form.set(FormState::new(&fields, E::form_values(Some(&row))));
            }
            RowAction::Delete => {
                let requested = page.write().request_delete(id, row.display_name());
                if let Err(err) = requested {
                    notify(page, Notice::error(err.to_string()));
                }
            }
            RowAction::ToggleActive => {
                let claimed = page.write().begin_toggle(id);
                let ticket = match claimed {
                    Ok(ticket) => ticket,
                    Err(err) => {
                        notify(page, Notice::error(err.to_string()));
                        return;
                    }
                };
                let edit = edit_for_rows.clone();
                let next = !row.is_active();
                spawn(async move {
                    let result = edit
                        .set_active(id, next)
                        .await
                        .map(|saved| {
                            let verb = if next { "Activated" } else { "Deactivated" };
                            format!("{verb} {}", saved.display_name())
                        })
                        .map_err(|err| err.to_string());
                    let refetch = page.write().finish(&ticket, result);
                    if refetch {
                        table.refetch();
                    }
                });
            }
        }
    });

    let on_create = move |_: MouseEvent| {
        page.write().open_create();
        let fields =
            dialog_fields::<E>(&current_lookups(lookups), context, Some(DialogTarget::Create));
        form.set(FormState::new(&fields, E::form_values(None)));
    };

    let on_field_change = use_callback(move |(name, value): (&'static str, String)| {
        let target = page.read().dialog_target();
        let fields = dialog_fields::<E>(&current_lookups(lookups), context, target);
        form.write().set_value(&fields, name, value);
    });
    let on_field_blur = use_callback(move |name: &'static str| {
        let target = page.read().dialog_target();
        let fields = dialog_fields::<E>(&current_lookups(lookups), context, target);
        form.write().blur(&fields, name);
    });
    let on_browse = use_callback(move |(name, accept): (&'static str, &'static str)| {
        let Some(path) = pick_file("Allowed files", accept) else {
            return;
        };
        let target = page.read().dialog_target();
        let fields = dialog_fields::<E>(&current_lookups(lookups), context, target);
        let mut state = form.write();
        state.set_value(&fields, name, path.display().to_string());
        state.blur(&fields, name);
    });

    let edit_for_submit = edit.clone();
    let on_submit = use_callback(move |_: ()| {
        let target = page.read().dialog_target();
        let Some(target) = target else {
            return;
        };
        let fields = dialog_fields::<E>(&current_lookups(lookups), context, Some(target));
        let submitted = form.write().submit(&fields);
        let Ok(values) = submitted else {
            return;
        };
        let input = match E::input_from_form(&values) {
            Ok(input) => input,
            Err(err) => {
                form.write().record_error(&err);
                return;
            }
        };
        let shop_id = match target {
            DialogTarget::Create => match create_shop_id(context, &values) {
                Ok(shop_id) => Some(shop_id),
                Err(err) => {
                    form.write().record_error(&err);
                    return;
                }
            },
            DialogTarget::Edit(_) => None,
        };
        let claimed = page.write().begin_submit();
        let ticket = match claimed {
            Ok(ticket) => ticket,
            Err(err) => {
                notify(page, Notice::error(err.to_string()));
                return;
            }
        };
        let edit = edit_for_submit.clone();
        spawn(async move {
            let result = match (ticket.id, shop_id) {
                (Some(id), _) => edit
                    .update(id, input)
                    .await
                    .map(|saved| format!("Updated {}", saved.display_name())),
                (None, Some(shop_id)) => edit
                    .create(shop_id, input)
                    .await
                    .map(|saved| format!("Created {}", saved.display_name())),
                (None, None) => Ok(String::new()),
            }
            .map_err(|err| err.to_string());
            let refetch = page.write().finish(&ticket, result);
            if refetch {
                table.refetch();
                lookups.restart();
            }
        });
    });

    let edit_for_delete = edit.clone();
    let on_confirm_delete = use_callback(move |_: ()| {
        let label = match &page.read().mode {
            PageMode::ConfirmDelete { label, .. } => label.clone(),
            _ => return,
        };
        let claimed = page.write().confirm_delete();
        let ticket = match claimed {
            Ok(ticket) => ticket,
            Err(err) => {
                notify(page, Notice::error(err.to_string()));
                return;
            }
        };
        let Some(id) = ticket.id else {
            return;
        };
        let edit = edit_for_delete.clone();
        spawn(async move {
            let result = edit
                .delete(id)
                .await
                .map(|()| format!("Deleted {label}"))
                .map_err(|err| err.to_string());
            let refetch = page.write().finish(&ticket, result);
            if refetch {
                table.refetch();
                lookups.restart();
            }
        });
    });

    let import = services.import.clone();
    let on_import = use_callback(move |_: ()| {
        let Some(shop_id) = context.shop_id() else {
            return;
        };
        let Some(path) = pick_import_file() else {
            return;
        };
        let import = import.clone();
        importing.set(true);
        spawn(async move {
            let result = import.import_products(shop_id, path).await;
            importing.set(false);
            match result {
                Ok(summary) => {
                    notify(
                        page,
                        Notice::success(format!(
                            "Imported {} products ({} new, {} updated)",
                            summary.rows(),
                            summary.inserted,
                            summary.updated
                        )),
                    );
                    table.refetch();
                    lookups.restart();
                }
                Err(err) => notify(page, Notice::error(format!("Import failed: {err}"))),
            }
        });
    });

    let import = services.import.clone();
    let export_dir = services.export_dir.clone();
    let on_export = use_callback(move |_: ()| {
        let file_name = format!("{table_key}.csv");
        let Some(path) = pick_export_file(&export_dir, &file_name) else {
            return;
        };
        let result = {
            let ctrl = controller.read();
            let vis = table.visibility.read();
            let columns = vis.visible_columns(ctrl.columns());
            let selected = ctrl.selected_rows();
            let rows = if selected.is_empty() {
                ctrl.page_rows()
            } else {
                selected
            };
            import.export_view(&path, &columns, &rows)
        };
        match result {
            Ok(written) => notify(
                page,
                Notice::success(format!("Exported {written} rows to {}", path.display())),
            ),
            Err(err) => notify(page, Notice::error(format!("Export failed: {err}"))),
        }
    });

    let lookup_data = current_lookups(lookups);
    let page_state = page.read().clone();
    let row_controls = controller
        .read()
        .page_rows()
        .iter()
        .map(|row| {
            let state = page_state.row_action_state(row.id());
            RowControls {
                busy: state.busy,
                disabled: state.disabled,
                active: row.is_active(),
            }
        })
        .collect::<Vec<_>>();

    let can_import = E::KIND == EntityKind::Product && context.shop_id().is_some();
    let export_label = match selected_count() {
        0 => "Export CSV".to_string(),
        count => format!("Export selected ({count})"),
    };

    let dialog = match page_state.mode.clone() {
        PageMode::DialogOpen(target) => {
            let fields = dialog_fields::<E>(&lookup_data, context, Some(target));
            let title = match target {
                DialogTarget::Create => format!("New {singular}"),
                DialogTarget::Edit(_) => format!("Edit {singular}"),
            };
            rsx! {
                FormDialog {
                    title,
                    fields,
                    state: form.read().clone(),
                    submitting: page_state.is_submitting(),
                    on_change: on_field_change,
                    on_blur: on_field_blur,
                    on_browse,
                    on_submit,
                    on_cancel: move |_| page.write().cancel(),
                }
            }
        }
        PageMode::ConfirmDelete { label, .. } => rsx! {
            ConfirmDialog {
                title: format!("Delete {singular}"),
                message: format!("Delete {label}? This cannot be undone."),
                busy: page_state.is_deleting(),
                on_confirm: on_confirm_delete,
                on_cancel: move |_| page.write().cancel(),
            }
        },
        PageMode::Idle => rsx! {},
    };

    rsx! {
        div { style: "display: flex; flex-direction: column; flex: 1; min-height: 0;",
            if let Some(notice) = page_state.notice.clone() {
                NoticeBanner {
                    notice,
                    on_dismiss: move |_| page.write().dismiss_notice(),
                }
            }
            {render_data_table(
                table,
                app,
                row_controls,
                Some(on_row_action),
                rsx! {
                    button {
                        style: "{button_style(true)}",
                        onclick: on_create,
                        "New {singular}"
                    }
                    if can_import {
                        button {
                            style: "{button_style(false)}",
                            disabled: importing(),
                            onclick: move |_| on_import.call(()),
                            if importing() { "Importing…" } else { "Import CSV" }
                        }
                    }
                    button {
                        style: "{button_style(false)}",
                        onclick: move |_| on_export.call(()),
                        "{export_label}"
                    }
                },
            )}
            {dialog}
        }
    }
}
