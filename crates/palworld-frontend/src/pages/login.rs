use yew::prelude::*;
use yew_router::prelude::*;

use palworld::{async_callback, log::info};

use crate::providers::use_api;
use crate::routes::Route;

#[function_component(LoginPage)]
pub fn login_page() -> Html {
    let api = use_api();
    let navigator = use_navigator();
    let username = use_state(String::new);
    let password = use_state(String::new);
    let loading = use_state(|| false);
    let error_msg = use_state(|| None::<String>);

    let on_username = {
        let username = username.clone();
        Callback::from(move |e: InputEvent| {
            if let Some(input) = e.target_dyn_into::<web_sys::HtmlInputElement>() {
                username.set(input.value());
            }
        })
    };

    let on_password = {
        let password = password.clone();
        Callback::from(move |e: InputEvent| {
            if let Some(input) = e.target_dyn_into::<web_sys::HtmlInputElement>() {
                password.set(input.value());
            }
        })
    };

    let submit = async_callback!([api, navigator, username, password, loading, error_msg] {
        loading.set(true);
        error_msg.set(None);

        match api.login(&username, &password).await {
            Ok(response) if response.is_logged_in => {
                info!(username = %*username, "Logged in");
                loading.set(false);
                if let Some(navigator) = navigator {
                    navigator.push(&Route::Home);
                }
            }
            Ok(_) => {
                loading.set(false);
                error_msg.set(Some("Invalid username or password".to_string()));
            }
            Err(err) => {
                loading.set(false);
                error_msg.set(Some(format!("Error during login: {err}")));
            }
        }
    });

    // The default has to be prevented synchronously, before the request is spawned
    let on_submit = Callback::from(move |event: SubmitEvent| {
        event.prevent_default();
        submit.emit(());
    });

    html! {
        <div class="p-8 max-w-sm">
            <h1 class="text-2xl font-bold mb-4">{ "Log in" }</h1>

            <form class="space-y-4" onsubmit={on_submit}>
                <input
                    type="text"
                    class="w-full px-3 py-2 border border-gray-300 rounded focus:outline-none focus:ring-2 focus:ring-blue-500"
                    placeholder="Username"
                    autocomplete="username"
                    value={(*username).clone()}
                    oninput={on_username}
                />
                <input
                    type="password"
                    class="w-full px-3 py-2 border border-gray-300 rounded focus:outline-none focus:ring-2 focus:ring-blue-500"
                    placeholder="Password"
                    autocomplete="current-password"
                    value={(*password).clone()}
                    oninput={on_password}
                />
                <button
                    type="submit"
                    class="bg-blue-600 text-white px-4 py-2 rounded hover:bg-blue-700 disabled:opacity-50 cursor-pointer"
                    disabled={*loading}
                >
                    { if *loading { "Logging in..." } else { "Log in" } }
                </button>
            </form>

            // Error display
            {
                if let Some(error) = error_msg.as_ref() {
                    html! {
                        <div class="mt-4 p-4 bg-red-100 text-red-700 rounded">
                            <p>{ error }</p>
                        </div>
                    }
                } else {
                    html! {}
                }
            }
        </div>
    }
}
