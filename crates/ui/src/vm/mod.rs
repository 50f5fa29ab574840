mod time_fmt;
mod treatment_board_vm;
mod treatment_form_vm;
mod treatment_list_vm;

pub use time_fmt::{DATE_NOT_SET, format_date, format_date_range};
pub use treatment_board_vm::{BoardIntent, TreatmentBoardVm};
pub use treatment_form_vm::{
    FieldInput, FormIntent, FormMode, FormOutcome, FormState, FormSubmission, ProgressPreviewVm,
    TreatmentFormVm, preview_progress,
};
pub use treatment_list_vm::{
    EMPTY_SUMMARY, TreatmentListVm, TreatmentRowVm, fill_style, render_treatments, summary_text,
};
