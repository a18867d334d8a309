mod pages;
mod providers;
mod routes;

use yew::prelude::*;
use yew_router::prelude::*;

use providers::ApiProvider;
use routes::{Route, switch};

#[function_component(App)]
fn app() -> Html {
    html! {
        <ApiProvider>
            <BrowserRouter>
                <Switch<Route> render={switch} />
            </BrowserRouter>
        </ApiProvider>
    }
}

fn main() {
    palworld::log::setup().expect("Failed to setup logging");
    yew::Renderer::<App>::new().render();
}
