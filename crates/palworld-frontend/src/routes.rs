use yew::prelude::*;
use yew_router::prelude::*;

use crate::pages::{HomePage, LoginPage};

#[derive(Clone, Routable, PartialEq)]
pub enum Route {
    #[at("/")]
    Home,
    // Must match palworld::interceptor::LOGIN_ROUTE, the 401 redirect target
    #[at("/login")]
    Login,
    #[not_found]
    #[at("/404")]
    NotFound,
}

pub fn switch(route: Route) -> Html {
    match route {
        Route::Home => html! { <HomePage /> },
        Route::Login => html! { <LoginPage /> },
        Route::NotFound => html! { <div>{ "404 Not Found" }</div> },
    }
}
