#[macro_export]
/// Allow defining an async callback that can be used in Yew components.
/// Every listed variable is cloned into the callback and again into the spawned
/// future, so handles like the API client or `UseStateHandle`s can be awaited on freely.
///
/// ## Without an event parameter
/// ```compile_fail
/// let refresh = async_callback!([api, status, error_msg] {
///     error_msg.set(None);
///     match api.check_login_status().await {
///         Ok(data) => status.set(Some(data)),
///         Err(err) => error_msg.set(Some(format!("Could not check login status: {err}"))),
///     }
/// });
/// ```
///
/// ## With an event parameter
/// ```compile_fail
/// let on_click = async_callback!([api, status] |event| {
///     let event: MouseEvent = event;
///     debug!(shift = event.shift_key(), "Refreshing login status");
///     if let Ok(data) = api.check_login_status().await {
///         status.set(Some(data));
///     }
/// });
/// ```
///
/// The future runs after the handler has returned, so `prevent_default` must be
/// called in a plain callback that then emits the async one.
macro_rules! async_callback {
    // Version without event parameter
    ([$($var:ident),* $(,)?] $body:expr) => {
        {
            $(let $var = $var.clone();)*
            Callback::from(move |_| {
                $(let $var = $var.clone();)*
                wasm_bindgen_futures::spawn_local(async move {
                    $body
                });
            })
        }
    };

    // Version with event parameter
    ([$($var:ident),* $(,)?] |$event:ident| $body:expr) => {
        {
            $(let $var = $var.clone();)*
            Callback::from(move |$event| {
                $(let $var = $var.clone();)*
                wasm_bindgen_futures::spawn_local(async move {
                    $body
                });
            })
        }
    };
}
