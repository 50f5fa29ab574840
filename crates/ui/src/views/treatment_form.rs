use dioxus::prelude::*;

use crate::vm::{FieldInput, FormIntent, ProgressPreviewVm, TreatmentFormVm};

#[component]
pub fn TreatmentFormCard(
    form: TreatmentFormVm,
    preview: ProgressPreviewVm,
    on_intent: Callback<FormIntent>,
) -> Element {
    let fields = form.fields().clone();
    let title = form.title();
    let error = form.error_message();
    let input = move |field: FieldInput| on_intent.call(FormIntent::Input(field));

    rsx! {
        form {
            id: "treatment-form",
            class: "form-card",
            onsubmit: move |evt| {
                evt.prevent_default();
                on_intent.call(FormIntent::Save);
            },
            h3 { class: "card-title", "{title}" }

            label { r#for: "treatment-type", "Treatment type" }
            input {
                id: "treatment-type",
                r#type: "text",
                placeholder: "e.g. Physiotherapy",
                value: "{fields.name}",
                oninput: move |evt| input(FieldInput::Name(evt.value())),
            }

            label { r#for: "treatment-frequency", "Frequency" }
            input {
                id: "treatment-frequency",
                r#type: "text",
                placeholder: "As needed",
                value: "{fields.frequency}",
                oninput: move |evt| input(FieldInput::Frequency(evt.value())),
            }

            div { class: "form-row",
                div { class: "form-field",
                    label { r#for: "start-date", "Start date" }
                    input {
                        id: "start-date",
                        r#type: "date",
                        value: "{fields.start_date}",
                        oninput: move |evt| input(FieldInput::StartDate(evt.value())),
                    }
                }
                div { class: "form-field",
                    label { r#for: "end-date", "End date" }
                    input {
                        id: "end-date",
                        r#type: "date",
                        value: "{fields.end_date}",
                        oninput: move |evt| input(FieldInput::EndDate(evt.value())),
                    }
                }
            }

            label { r#for: "doctor-notes", "Doctor's notes" }
            textarea {
                id: "doctor-notes",
                rows: "3",
                value: "{fields.notes}",
                oninput: move |evt| input(FieldInput::Notes(evt.value())),
            }

            label { class: "checkbox",
                input {
                    id: "reminder-toggle",
                    r#type: "checkbox",
                    checked: fields.reminders,
                    onchange: move |evt| input(FieldInput::Reminders(evt.checked())),
                }
                "Remind me"
            }
            label { class: "checkbox",
                input {
                    id: "caregiver-toggle",
                    r#type: "checkbox",
                    checked: fields.caregiver_notifications,
                    onchange: move |evt| input(FieldInput::CaregiverNotifications(evt.checked())),
                }
                "Notify my caregiver"
            }

            label { r#for: "manual-progress", "Progress override (%)" }
            input {
                id: "manual-progress",
                r#type: "number",
                min: "0",
                max: "100",
                placeholder: "Auto",
                value: "{fields.manual_progress}",
                oninput: move |evt| input(FieldInput::ManualProgress(evt.value())),
            }

            div { class: "progress-preview",
                div { class: "progress-bar",
                    div { class: "progress-fill", style: "{preview.fill_style}" }
                }
                span { class: "preview-percentage", "{preview.progress_label}" }
                p { class: "preview-hint", "{preview.hint}" }
            }

            {error.map(|message| rsx! {
                p { class: "form-error", "{message}" }
            })}

            div { class: "form-actions",
                button {
                    id: "cancel-treatment-btn",
                    class: "btn",
                    r#type: "button",
                    onclick: move |_| on_intent.call(FormIntent::Cancel),
                    "Cancel"
                }
                button {
                    id: "save-treatment-btn",
                    class: "btn btn-primary",
                    r#type: "submit",
                    "Save"
                }
            }
        }
    }
}
