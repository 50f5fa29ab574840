use dioxus::prelude::*;
use futures::StreamExt;
#[cfg(test)]
use std::cell::RefCell;
#[cfg(test)]
use std::rc::Rc;
use treatment_core::model::TreatmentId;
use treatment_core::store::{StoreChange, TreatmentStore};

use crate::context::AppContext;
use crate::views::treatment_form::TreatmentFormCard;
use crate::views::{ViewError, ViewState, view_state_from_resource};
use crate::vm::{BoardIntent, FormIntent, TreatmentBoardVm, TreatmentListVm, TreatmentRowVm};

const SAVE_FAILED: &str = "Could not save your last change.";

#[component]
pub fn TreatmentsView() -> Element {
    let ctx = use_context::<AppContext>();
    let treatments = ctx.treatments();

    let resource = use_resource(move || {
        let treatments = treatments.clone();
        async move {
            treatments.load_store().await.map_err(|err| {
                tracing::warn!(error = %err, "failed to load treatments");
                ViewError::Unknown
            })
        }
    });

    let state = view_state_from_resource(&resource);

    rsx! {
        div { class: "page",
            match state {
                ViewState::Idle | ViewState::Loading => rsx! {
                    p { "Loading..." }
                },
                ViewState::Ready(store) => rsx! {
                    TreatmentBoard { store }
                },
                ViewState::Error(err) => rsx! {
                    p { class: "view-error", "{err.message()}" }
                },
            }
        }
    }
}

/// Board state shared between the treatment components.
#[derive(Clone, Copy)]
pub(crate) struct BoardHandle {
    pub(crate) board: Signal<TreatmentBoardVm>,
    pub(crate) notice: Signal<Option<&'static str>>,
    pub(crate) dispatch: Callback<BoardIntent>,
}

/// Own a board for `store` and write every store change through to the service.
///
/// Changes are persisted by a single consumer, one at a time and in the order
/// they were made.
pub(crate) fn use_treatment_board(store: TreatmentStore) -> BoardHandle {
    let ctx = use_context::<AppContext>();
    let clock = ctx.clock();
    let service = ctx.treatments();

    let mut board = use_signal(move || TreatmentBoardVm::new(store));
    let notice = use_signal(|| None::<&'static str>);

    let writer = use_coroutine(move |mut changes: UnboundedReceiver<StoreChange>| {
        let service = service.clone();
        async move {
            let mut notice = notice;
            while let Some(change) = changes.next().await {
                match service.persist(&change).await {
                    Ok(()) => notice.set(None),
                    Err(err) => {
                        tracing::warn!(error = %err, "failed to save treatment change");
                        notice.set(Some(SAVE_FAILED));
                    }
                }
            }
        }
    });

    let dispatch = use_callback(move |intent: BoardIntent| {
        let result = board.write().dispatch(intent, clock.now());
        match result {
            Ok(Some(change)) => writer.send(change),
            Ok(None) => {}
            Err(err) => tracing::warn!(error = %err, "treatment action ignored"),
        }
    });

    BoardHandle {
        board,
        notice,
        dispatch,
    }
}

#[component]
fn TreatmentBoard(store: TreatmentStore) -> Element {
    let clock = use_context::<AppContext>().clock();
    let BoardHandle {
        board,
        notice,
        dispatch,
    } = use_treatment_board(store);
    let mut pending_delete = use_signal(|| None::<TreatmentId>);

    #[cfg(test)]
    {
        let mut registered = use_signal(|| false);
        if !registered() {
            registered.set(true);
            if let Some(handles) = try_consume_context::<BoardTestHandles>() {
                handles.register(dispatch, board);
            }
        }
    }

    let request_delete = use_callback(move |id: TreatmentId| pending_delete.set(Some(id)));
    let close_delete = use_callback(move |()| pending_delete.set(None));
    let confirm_delete = use_callback(move |()| {
        let target = pending_delete();
        pending_delete.set(None);
        if let Some(id) = target {
            dispatch.call(BoardIntent::Delete(id));
        }
    });

    let today = clock.today();
    let (list, form) = {
        let board = board.read();
        (board.render(today), board.form().clone())
    };
    let preview = form.preview(today);
    let show_form = form.is_open();
    let show_delete_modal = pending_delete().is_some();
    let notice_text = notice();

    rsx! {
        section { class: "treatments",
            h2 { id: "overall-progress-title", class: "overall-progress", "{list.summary}" }

            TreatmentList {
                list,
                on_edit: move |id| dispatch.call(BoardIntent::Edit(id)),
                on_delete: request_delete,
            }

            if show_form {
                TreatmentFormCard {
                    form,
                    preview,
                    on_intent: move |intent| dispatch.call(BoardIntent::Form(intent)),
                }
            } else {
                button {
                    id: "add-treatment-btn",
                    class: "btn btn-primary",
                    r#type: "button",
                    onclick: move |_| dispatch.call(BoardIntent::Form(FormIntent::Open)),
                    "+ Add treatment"
                }
            }

            {notice_text.map(|message| rsx! {
                p { class: "notice", "{message}" }
            })}

            if show_delete_modal {
                DeleteModal { on_close: close_delete, on_confirm: confirm_delete }
            }
        }
    }
}

#[component]
pub fn TreatmentList(
    list: TreatmentListVm,
    on_edit: Callback<TreatmentId>,
    on_delete: Callback<TreatmentId>,
) -> Element {
    rsx! {
        div { id: "treatments-list", class: "treatments-list",
            for row in list.rows {
                TreatmentRow { key: "{row.id}", row, on_edit, on_delete }
            }
        }
    }
}

#[component]
fn TreatmentRow(
    row: TreatmentRowVm,
    on_edit: Callback<TreatmentId>,
    on_delete: Callback<TreatmentId>,
) -> Element {
    let id = row.id;
    let details = match &row.status {
        Some(status) => format!("{} • {status}", row.frequency),
        None => row.frequency.clone(),
    };

    rsx! {
        div { class: "treatment-item",
            div { class: "treatment-header",
                span { class: "treatment-name", "{row.name}" }
                div { class: "treatment-actions",
                    span { class: "treatment-percentage", "{row.progress_label}" }
                    button {
                        class: "icon-btn",
                        r#type: "button",
                        title: "Edit",
                        onclick: move |_| on_edit.call(id),
                        "Edit"
                    }
                    button {
                        class: "icon-btn danger",
                        r#type: "button",
                        title: "Delete",
                        onclick: move |_| on_delete.call(id),
                        "Delete"
                    }
                }
            }
            div { class: "progress-bar",
                div { class: "progress-fill", style: "{row.fill_style}" }
            }
            div { class: "treatment-details",
                span { class: "treatment-schedule", "{details}" }
                span { class: "treatment-dates", "{row.dates_label}" }
            }
        }
    }
}

#[component]
fn DeleteModal(on_close: Callback<()>, on_confirm: Callback<()>) -> Element {
    rsx! {
        div {
            class: "modal-overlay",
            onclick: move |_| on_close.call(()),
            div {
                class: "modal",
                onclick: move |evt| evt.stop_propagation(),
                h3 { class: "modal-title", "Delete treatment?" }
                p { class: "modal-body", "This removes the treatment and its progress." }
                div { class: "modal-actions",
                    button {
                        class: "btn modal-cancel",
                        r#type: "button",
                        onclick: move |_| on_close.call(()),
                        "Cancel"
                    }
                    button {
                        class: "btn modal-confirm",
                        r#type: "button",
                        onclick: move |_| on_confirm.call(()),
                        "Delete"
                    }
                }
            }
        }
    }
}

#[cfg(test)]
#[derive(Clone, Default)]
pub(crate) struct BoardTestHandles {
    dispatch: Rc<RefCell<Option<Callback<BoardIntent>>>>,
    board: Rc<RefCell<Option<Signal<TreatmentBoardVm>>>>,
}

#[cfg(test)]
impl BoardTestHandles {
    pub(crate) fn register(&self, dispatch: Callback<BoardIntent>, board: Signal<TreatmentBoardVm>) {
        *self.dispatch.borrow_mut() = Some(dispatch);
        *self.board.borrow_mut() = Some(board);
    }

    pub(crate) fn dispatch(&self) -> Callback<BoardIntent> {
        (*self.dispatch.borrow()).expect("board dispatch registered")
    }

    pub(crate) fn board(&self) -> TreatmentBoardVm {
        let board = (*self.board.borrow()).expect("board registered");
        board.peek().clone()
    }
}
