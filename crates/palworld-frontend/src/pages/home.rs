use yew::prelude::*;
use yew_router::prelude::*;

use palworld::{async_callback, data::LoginStatusResponse, log::info};

use crate::providers::use_api;
use crate::routes::Route;

#[function_component(HomePage)]
pub fn home_page() -> Html {
    let api = use_api();
    let status = use_state(|| None::<LoginStatusResponse>);
    let loading = use_state(|| true);
    let error_msg = use_state(|| None::<String>);

    let refresh = async_callback!([api, status, loading, error_msg] {
        loading.set(true);
        error_msg.set(None);

        match api.check_login_status().await {
            Ok(data) => {
                info!(logged_in = data.is_logged_in, "Login status checked");
                status.set(Some(data));
                loading.set(false);
            }
            Err(err) => {
                loading.set(false);
                error_msg.set(Some(format!("Error checking login status: {err}")));
            }
        }
    });

    // Check once on mount
    use_effect_with((), {
        let refresh = refresh.clone();
        move |_| refresh.emit(())
    });

    html! {
        <div class="p-8">
            <h1 class="text-2xl font-bold mb-4">{ "Palworld Server" }</h1>

            <div class="mb-8 p-4 border border-gray-200 rounded">
                <h2 class="text-xl font-semibold mb-4">{ "Session" }</h2>

                <button
                    class="bg-blue-600 text-white px-4 py-2 rounded hover:bg-blue-700 disabled:opacity-50 cursor-pointer"
                    onclick={refresh.reform(|_: MouseEvent| ())}
                    disabled={*loading}
                >
                    { if *loading { "Checking..." } else { "Check again" } }
                </button>

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

                // Status display
                {
                    match status.as_ref() {
                        Some(status) if status.is_logged_in => html! {
                            <div class="mt-4 p-4 bg-green-100 rounded">
                                <p>{ "You are logged in." }</p>
                            </div>
                        },
                        Some(status) => html! {
                            <div class="mt-4 p-4 bg-yellow-100 rounded">
                                <p>{ status.error.clone().unwrap_or_else(|| "You are not logged in.".to_string()) }</p>
                                <Link<Route> to={Route::Login} classes={classes!("underline")}>{ "Log in" }</Link<Route>>
                            </div>
                        },
                        None => html! {},
                    }
                }
            </div>
        </div>
    }
}
