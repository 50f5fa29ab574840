use dioxus::prelude::*;
use dioxus_router::{Outlet, Routable};

use crate::views::TreatmentsView;

#[derive(Clone, Routable, PartialEq)]
#[rustfmt::skip]
pub enum Route {
    #[layout(Layout)]
        #[route("/", TreatmentsView)] Treatments {},
}

#[component]
fn Layout() -> Element {
    rsx! {
        div { class: "app",
            header { class: "app-header",
                h1 { "My Treatments" }
            }
            main { class: "content",
                Outlet::<Route> {}
            }
        }
    }
}
