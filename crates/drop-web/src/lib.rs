pub mod audio;
pub mod host;
pub mod runner;
pub mod surface;

pub use audio::AudioBank;
pub use host::HostInfo;
pub use runner::GameRunner;
pub use surface::CanvasSurface;

/// Generate all `#[wasm_bindgen]` exports for a game.
///
/// Generates:
/// - `thread_local!` storage for the GameRunner
/// - `with_runner()` helper function
/// - All wasm-bindgen exports (game_init, game_tick, input handlers, asset loading, data accessors)
///
/// # Usage
///
/// ```ignore
/// use wasm_bindgen::prelude::*;
/// use drop_engine::*;
///
/// mod game;
/// use game::MyGame;
///
/// // `MyGame::new()` builds the game
/// drop_web::export_game!(MyGame, "my-game");
///
/// // or build it from the browser viewport and a time-derived seed,
/// // and export the overlay buffer (needs the `vectors` feature)
/// drop_web::export_game!(MyGame, "my-game", host = MyGame::from_host, vectors);
/// ```
///
/// # Arguments
///
/// - `$game_type`: The game struct type that implements `drop_engine::Game`
/// - `$game_name`: A string literal used in the initialization log message
/// - `host = $ctor`: optional `fn(&drop_web::HostInfo) -> $game_type`
/// - `vectors`: also export `get_overlay_ptr` / `get_overlay_vertex_count`
#[macro_export]
macro_rules! export_game {
    (@exports $game_type:ty, $game_name:literal, $ctor:expr) => {
        use std::cell::RefCell;

        thread_local! {
            static RUNNER: RefCell<Option<$crate::GameRunner<$game_type>>> = RefCell::new(None);
        }

        fn with_runner<R>(f: impl FnOnce(&mut $crate::GameRunner<$game_type>) -> R) -> R {
            RUNNER.with(|cell| {
                let mut borrow = cell.borrow_mut();
                let runner = borrow.as_mut().expect("Game not initialized. Call game_init() first.");
                f(runner)
            })
        }

        #[wasm_bindgen]
        pub fn game_init() {
            console_error_panic_hook::set_once();
            let _ = console_log::init_with_level(log::Level::Info);

            let host = $crate::HostInfo::detect();
            let game: $game_type = ($ctor)(&host);
            let runner = $crate::GameRunner::new(game);

            RUNNER.with(|cell| {
                *cell.borrow_mut() = Some(runner);
            });

            with_runner(|r| r.init());
            log::info!(
                "{}: initialized ({}x{})",
                $game_name,
                host.viewport_width,
                host.viewport_height
            );
        }

        #[wasm_bindgen]
        pub fn game_tick(dt: f32) {
            with_runner(|r| r.tick(dt));
        }

        #[wasm_bindgen]
        pub fn game_pointer_down(x: f32, y: f32) {
            with_runner(|r| r.push_input(InputEvent::PointerDown { x, y }));
        }

        #[wasm_bindgen]
        pub fn game_pointer_up(x: f32, y: f32) {
            with_runner(|r| r.push_input(InputEvent::PointerUp { x, y }));
        }

        #[wasm_bindgen]
        pub fn game_pointer_move(x: f32, y: f32) {
            with_runner(|r| r.push_input(InputEvent::PointerMove { x, y }));
        }

        #[wasm_bindgen]
        pub fn game_custom_event(kind: u32, a: f32, b: f32, c: f32) {
            with_runner(|r| r.push_input(InputEvent::Custom { kind, a, b, c }));
        }

        #[wasm_bindgen]
        pub fn game_load_manifest(json: &str) {
            with_runner(|r| r.load_manifest(json));
        }

        #[wasm_bindgen]
        pub fn game_attach_surface(element_id: &str) {
            with_runner(|r| r.attach_surface(element_id));
        }

        // ---- Data accessors ----

        #[wasm_bindgen]
        pub fn get_instances_ptr() -> *const f32 {
            with_runner(|r| r.instances_ptr())
        }

        #[wasm_bindgen]
        pub fn get_instance_count() -> u32 {
            with_runner(|r| r.instance_count())
        }

        #[wasm_bindgen]
        pub fn get_sound_events_ptr() -> *const u8 {
            with_runner(|r| r.sound_events_ptr())
        }

        #[wasm_bindgen]
        pub fn get_sound_events_len() -> u32 {
            with_runner(|r| r.sound_events_len())
        }

        #[wasm_bindgen]
        pub fn get_game_events_ptr() -> *const f32 {
            with_runner(|r| r.game_events_ptr())
        }

        #[wasm_bindgen]
        pub fn get_game_events_len() -> u32 {
            with_runner(|r| r.game_events_len())
        }

        #[wasm_bindgen]
        pub fn get_world_width() -> f32 {
            with_runner(|r| r.world_width())
        }

        #[wasm_bindgen]
        pub fn get_world_height() -> f32 {
            with_runner(|r| r.world_height())
        }

        // ---- Capacity accessors ----

        #[wasm_bindgen]
        pub fn get_max_instances() -> u32 {
            with_runner(|r| r.max_instances())
        }

        #[wasm_bindgen]
        pub fn get_max_sounds() -> u32 {
            with_runner(|r| r.max_sounds())
        }

        #[wasm_bindgen]
        pub fn get_max_events() -> u32 {
            with_runner(|r| r.max_events())
        }
    };

    // ---- Overlay accessors (only when the vectors feature is enabled) ----
    (@overlay) => {
        #[wasm_bindgen]
        pub fn get_overlay_ptr() -> *const f32 {
            with_runner(|r| r.overlay_ptr())
        }

        #[wasm_bindgen]
        pub fn get_overlay_vertex_count() -> u32 {
            with_runner(|r| r.overlay_vertex_count())
        }
    };

    ($game_type:ty, $game_name:literal, host = $ctor:expr, vectors) => {
        $crate::export_game!(@exports $game_type, $game_name, $ctor);
        $crate::export_game!(@overlay);
    };

    ($game_type:ty, $game_name:literal, host = $ctor:expr) => {
        $crate::export_game!(@exports $game_type, $game_name, $ctor);
    };

    ($game_type:ty, $game_name:literal, vectors) => {
        $crate::export_game!($game_type, $game_name, host = |_host: &$crate::HostInfo| <$game_type>::new(), vectors);
    };

    ($game_type:ty, $game_name:literal) => {
        $crate::export_game!($game_type, $game_name, host = |_host: &$crate::HostInfo| <$game_type>::new());
    };
}
