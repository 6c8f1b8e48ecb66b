//! Deep Dive entry point
//!
//! On the web: builds the play field in the DOM, wires input and runs the
//! session on requestAnimationFrame. Natively: plays headless autopilot
//! sessions and logs the results.

#[cfg(not(target_arch = "wasm32"))]
use clap::Parser;
#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::{Cell, RefCell};
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use wasm_bindgen_futures::JsFuture;
    use web_sys::{Document, KeyboardEvent, PointerEvent, ShareData};

    use deep_dive::audio::AudioManager;
    use deep_dive::consts::*;
    use deep_dive::feedback::{self, Cue, Flash, Milestone};
    use deep_dive::highscores::LocalStorageStore;
    use deep_dive::reporting::HttpReporter;
    use deep_dive::sim::{GamePhase, Snapshot};
    use deep_dive::{FrameScheduler, Session, SessionConfig, Settings};

    // Confetti is pure decoration, so it lives in JS
    #[wasm_bindgen(inline_js = "
        export function spawn_confetti(count) {
            const field = document.getElementById('field');
            if (!field) return;
            const colors = ['#22d3ee', '#a3e635', '#facc15', '#f472b6', '#818cf8'];
            for (let i = 0; i < count; i++) {
                const p = document.createElement('div');
                p.className = 'confetti';
                p.style.left = (Math.random() * 100) + '%';
                p.style.background = colors[i % colors.length];
                p.style.animationDelay = (Math.random() * 0.3) + 's';
                field.appendChild(p);
                setTimeout(() => p.remove(), 1600);
            }
        }
    ")]
    extern "C" {
        fn spawn_confetti(count: u32);
    }

    const FIELD_HTML: &str = r#"
        <div id="field">
            <div id="obstacles"></div>
            <div id="player">🤿</div>
            <div id="flash" class="flash"></div>
        </div>
        <div id="hud">
            <div id="hud-score" class="hud-item"><span class="hud-value">0</span></div>
            <div id="hud-best" class="hud-item">BEST <span class="hud-value">0</span></div>
            <div id="hud-tier" class="hud-item"></div>
            <div id="hud-milestone" class="hud-item"></div>
            <div id="hud-fps" class="hud-item hidden">FPS <span class="hud-value">0</span></div>
            <button id="sound-toggle" class="hud-item"></button>
        </div>
        <div id="start-prompt">Tap, click or press space to dive</div>
        <div id="game-over" class="hidden">
            <div>SCORE <span id="final-score">0</span></div>
            <div>BEST <span id="final-best">0</span></div>
            <div id="new-best" class="hidden">NEW BEST!</div>
            <div>Tap to try again</div>
            <button id="share-btn">Challenge a Friend</button>
        </div>
    "#;

    /// requestAnimationFrame chain that the session can start and cancel
    #[derive(Clone, Default)]
    struct AnimationFrameLoop {
        callback: Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>>,
        handle: Rc<Cell<Option<i32>>>,
    }

    impl AnimationFrameLoop {
        fn request(&self) {
            if self.handle.get().is_some() {
                return;
            }
            let Some(window) = web_sys::window() else { return };
            let callback = self.callback.borrow();
            let Some(callback) = callback.as_ref() else {
                log::warn!("Frame requested before the loop was wired");
                return;
            };
            match window.request_animation_frame(callback.as_ref().unchecked_ref()) {
                Ok(id) => self.handle.set(Some(id)),
                Err(e) => log::error!("requestAnimationFrame failed: {:?}", e),
            }
        }

        /// Called at the top of every frame: the pending request has fired
        fn fired(&self) {
            self.handle.set(None);
        }
    }

    impl FrameScheduler for AnimationFrameLoop {
        fn start(&mut self) {
            self.request();
        }

        fn stop(&mut self) {
            if let (Some(id), Some(window)) = (self.handle.take(), web_sys::window()) {
                let _ = window.cancel_animation_frame(id);
            }
        }
    }

    /// Game instance holding all state
    struct Game {
        session: Session,
        settings: Settings,
        audio: AudioManager,
        document: Document,
        // FPS tracking
        frame_times: [f64; 60],
        frame_index: usize,
        fps: u32,
        last_phase: GamePhase,
    }

    impl Game {
        fn frame(&mut self, time: f64) {
            self.session.frame(time);
            self.play_cues();
            self.track_fps(time);
            self.render();
        }

        fn impulse(&mut self) {
            self.audio.resume();
            self.session.impulse();
            // Start and restart happen outside the frame loop
            self.play_cues();
            self.render();
        }

        fn play_cues(&mut self) {
            let new_best = self.session.is_new_best();
            for event in self.session.drain_events() {
                let cue = feedback::cue_for(&event, new_best, &self.settings);
                self.apply_cue(&cue);
            }
        }

        fn apply_cue(&self, cue: &Cue) {
            if let Some(sound) = cue.sound {
                self.audio.play(sound);
            }
            if let (Some(pattern), Some(window)) = (cue.haptic, web_sys::window()) {
                let pattern: js_sys::Array =
                    pattern.iter().map(|ms| JsValue::from(*ms)).collect();
                let _ = window.navigator().vibrate_with_pattern(&pattern);
            }
            if let Some(flash) = cue.flash {
                let class = match flash {
                    Flash::Cyan => "flash flash-cyan",
                    Flash::Green => "flash flash-green",
                    Flash::Red => "flash flash-red",
                };
                self.restart_animation("flash", class, "flash");
            }
            if cue.shake {
                self.restart_animation("field", "shake", "");
            }
            if let Some(confetti) = cue.confetti {
                spawn_confetti(confetti.particles);
            }
        }

        /// Re-trigger a CSS animation by resetting the class
        fn restart_animation(&self, id: &str, class: &str, base: &str) {
            if let Some(el) = self.document.get_element_by_id(id) {
                let _ = el.set_attribute("class", base);
                if let Some(html) = el.dyn_ref::<web_sys::HtmlElement>() {
                    // Reading layout flushes the class change
                    let _ = html.offset_width();
                }
                let _ = el.set_attribute("class", class);
            }
        }

        fn track_fps(&mut self, time: f64) {
            self.frame_times[self.frame_index] = time;
            self.frame_index = (self.frame_index + 1) % 60;

            let oldest_time = self.frame_times[self.frame_index];
            if oldest_time > 0.0 {
                let elapsed = time - oldest_time;
                if elapsed > 0.0 {
                    self.fps = (60000.0 / elapsed).round() as u32;
                }
            }
        }

        fn set_text(&self, selector: &str, text: &str) {
            if let Some(el) = self.document.query_selector(selector).ok().flatten() {
                el.set_text_content(Some(text));
            }
        }

        fn set_visible(&self, id: &str, visible: bool) {
            if let Some(el) = self.document.get_element_by_id(id) {
                let _ = el.class_list().toggle_with_force("hidden", !visible);
            }
        }

        fn render(&mut self) {
            let snapshot = self.session.snapshot();
            self.render_field(&snapshot);
            self.update_hud(&snapshot);

            if snapshot.phase != self.last_phase {
                self.set_visible("start-prompt", snapshot.phase == GamePhase::Idle);
                self.set_visible("game-over", snapshot.phase == GamePhase::Ended);
                if snapshot.phase == GamePhase::Ended {
                    self.set_text("#final-score", &snapshot.score.to_string());
                    self.set_text("#final-best", &snapshot.best_score.to_string());
                    self.set_visible("new-best", self.session.is_new_best());
                }
                self.last_phase = snapshot.phase;
            }
        }

        fn render_field(&self, snapshot: &Snapshot) {
            if let Some(player) = self
                .document
                .get_element_by_id("player")
                .and_then(|el| el.dyn_into::<web_sys::HtmlElement>().ok())
            {
                let style = player.style();
                let _ =
                    style.set_property("left", &format!("{}%", PLAYER_X - PLAYER_HALF_SIZE));
                let _ = style.set_property("top", &format!("{}%", snapshot.player.top()));
                let _ = style.set_property(
                    "transform",
                    &format!("rotate({}deg)", snapshot.player.rotation),
                );
            }

            if let Some(container) = self.document.get_element_by_id("obstacles") {
                let html: String = snapshot
                    .obstacles
                    .iter()
                    .map(|o| {
                        format!(
                            concat!(
                                r#"<div class="wall" "#,
                                r#"style="left:{x}%;top:0;height:{top}%;width:{w}%">"#,
                                r#"</div><div class="wall" "#,
                                r#"style="left:{x}%;top:{bottom}%;bottom:0;width:{w}%">"#,
                                r#"<span class="distraction" title="{name}">{emoji}</span></div>"#,
                            ),
                            x = o.x,
                            w = OBSTACLE_WIDTH,
                            top = o.gap_top(),
                            bottom = o.gap_bottom(),
                            name = o.kind.name(),
                            emoji = o.kind.emoji(),
                        )
                    })
                    .collect();
                container.set_inner_html(&html);
            }
        }

        fn update_hud(&self, snapshot: &Snapshot) {
            self.set_text("#hud-score .hud-value", &snapshot.score.to_string());
            self.set_text("#hud-best .hud-value", &snapshot.best_score.to_string());
            self.set_text("#hud-tier", &feedback::difficulty_badge(snapshot.tier));

            let milestone = Milestone::for_score(snapshot.score);
            self.set_text(
                "#hud-milestone",
                &format!("{} {}", milestone.emoji(), milestone.label()),
            );

            if self.settings.show_fps {
                self.set_text("#hud-fps .hud-value", &self.fps.to_string());
            }
            self.set_text("#sound-toggle", if self.settings.sound { "🔊" } else { "🔇" });
        }

        fn toggle_sound(&mut self) {
            self.settings.sound = !self.settings.sound;
            self.settings.save();
            self.audio.apply_settings(&self.settings);
            log::info!("Sound {}", if self.settings.sound { "on" } else { "off" });
        }
    }

    pub async fn run() {
        console_error_panic_hook::set_once();
        if let Err(e) = console_log::init_with_level(log::Level::Info) {
            web_sys::console::error_1(&format!("Failed to init logger: {}", e).into());
        }

        log::info!("Deep Dive starting...");

        let Some(document) = web_sys::window().and_then(|w| w.document()) else {
            log::error!("No document - cannot start");
            return;
        };
        let Some(root) = document
            .get_element_by_id("game")
            .or_else(|| document.body().map(Into::into))
        else {
            log::error!("No #game element or body to mount into");
            return;
        };
        root.set_inner_html(FIELD_HTML);

        let api_base = root
            .get_attribute("data-api-base")
            .unwrap_or_else(|| "/api".to_string());

        let settings = Settings::load();
        let frame_loop = AnimationFrameLoop::default();
        let session = Session::new(SessionConfig::new(js_sys::Date::now() as u64))
            .with_store(Box::new(LocalStorageStore))
            .with_reporter(Box::new(HttpReporter::new(api_base)))
            .with_scheduler(Box::new(frame_loop.clone()));

        let game = Rc::new(RefCell::new(Game {
            session,
            audio: AudioManager::new(&settings),
            settings,
            document,
            frame_times: [0.0; 60],
            frame_index: 0,
            fps: 0,
            last_phase: GamePhase::Ended,
        }));

        {
            let game = game.clone();
            let next = frame_loop.clone();
            *frame_loop.callback.borrow_mut() = Some(Closure::new(move |time: f64| {
                next.fired();
                let mut g = game.borrow_mut();
                g.frame(time);
                if g.session.is_running() {
                    next.request();
                }
            }));
        }

        {
            let mut g = game.borrow_mut();
            let show_fps = g.settings.show_fps;
            g.set_visible("hud-fps", show_fps);
            g.render();
        }

        setup_input_handlers(game.clone());
        setup_leave_handler(game);

        log::info!("Deep Dive ready");
    }

    fn setup_input_handlers(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else { return };
        let Some(document) = window.document() else { return };

        // Keyboard
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                if event.repeat() {
                    return;
                }
                match event.code().as_str() {
                    "Space" | "ArrowUp" | "KeyW" => {
                        event.prevent_default();
                        game.borrow_mut().impulse();
                    }
                    _ => {}
                }
            });
            let _ = window
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Tap / click on the play field
        if let Some(field) = document.get_element_by_id("field") {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: PointerEvent| {
                event.prevent_default();
                game.borrow_mut().impulse();
            });
            let _ = field
                .add_event_listener_with_callback("pointerdown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Overlays also start a session
        for id in ["start-prompt", "game-over"] {
            if let Some(el) = document.get_element_by_id(id) {
                let game = game.clone();
                let closure = Closure::<dyn FnMut(_)>::new(move |_event: PointerEvent| {
                    game.borrow_mut().impulse();
                });
                let _ = el.add_event_listener_with_callback(
                    "pointerdown",
                    closure.as_ref().unchecked_ref(),
                );
                closure.forget();
            }
        }

        if let Some(btn) = document.get_element_by_id("sound-toggle") {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: PointerEvent| {
                event.stop_propagation();
                game.borrow_mut().toggle_sound();
            });
            let _ = btn
                .add_event_listener_with_callback("pointerdown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Share: keep the press from restarting, share on click (needs user activation)
        if let Some(btn) = document.get_element_by_id("share-btn") {
            let closure = Closure::<dyn FnMut(_)>::new(move |event: PointerEvent| {
                event.stop_propagation();
            });
            let _ = btn
                .add_event_listener_with_callback("pointerdown", closure.as_ref().unchecked_ref());
            closure.forget();

            let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::MouseEvent| {
                event.stop_propagation();
                let score = game.borrow().session.score();
                share_score(score);
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    /// Share sheet where supported, clipboard otherwise. Failures are only logged.
    fn share_score(score: u32) {
        let Some(window) = web_sys::window() else { return };
        let navigator = window.navigator();
        let text = feedback::share_text(score);
        let supports = |name: &str| {
            js_sys::Reflect::has(&navigator, &JsValue::from_str(name)).unwrap_or(false)
        };

        let (promise, done) = if supports("share") {
            let data = ShareData::new();
            data.set_title(feedback::SHARE_TITLE);
            data.set_text(&text);
            (navigator.share_with_data(&data), "Score shared")
        } else if supports("clipboard") {
            (navigator.clipboard().write_text(&text), "Challenge copied to clipboard")
        } else {
            log::warn!("Sharing is not supported in this browser");
            return;
        };

        wasm_bindgen_futures::spawn_local(async move {
            match JsFuture::from(promise).await {
                Ok(_) => log::info!("{} ({})", done, score),
                Err(e) => log::warn!("Failed to share score: {:?}", e),
            }
        });
    }

    /// Navigating away abandons the current run
    fn setup_leave_handler(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else { return };
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            game.borrow_mut().session.leave();
        });
        let _ =
            window.add_event_listener_with_callback("pagehide", closure.as_ref().unchecked_ref());
        closure.forget();
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() {
    wasm_game::run().await;
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use deep_dive::consts::FIXED_STEP_MS;
    use deep_dive::feedback::{Milestone, difficulty_badge};
    use deep_dive::sim::{Autopilot, GameEvent, GamePhase};
    use deep_dive::{Session, SessionConfig};

    use clap::Parser;

    /// Longest run before the headless host gives up (3 minutes of play)
    const MAX_TICKS: u32 = 60 * 180;

    /// Play Deep Dive sessions headless with the autopilot
    #[derive(Parser, Debug, Clone, PartialEq)]
    #[command(name = "deep-dive", version, about)]
    pub struct Options {
        /// seed for obstacle placement (defaults to the current time)
        #[arg(long)]
        pub seed: Option<u64>,

        /// number of sessions to play
        #[arg(long, default_value_t = 1)]
        pub sessions: u32,
    }

    pub fn run(options: &Options) {
        let seed = options.seed.unwrap_or_else(|| deep_dive::now_ms() as u64);
        log::info!(
            "Playing {} headless session(s) with seed {}",
            options.sessions,
            seed
        );

        let mut session = Session::new(SessionConfig::new(seed));
        let autopilot = Autopilot::default();

        for n in 1..=options.sessions {
            session.start();
            let mut tiers_reached = 0;

            for _ in 0..MAX_TICKS {
                let snapshot = session.snapshot();
                if autopilot.wants_impulse(&snapshot.player, &snapshot.obstacles) {
                    session.impulse();
                }
                session.advance(FIXED_STEP_MS);

                tiers_reached += session
                    .drain_events()
                    .iter()
                    .filter(|e| matches!(e, GameEvent::TierUp { .. }))
                    .count();
                if session.phase() == GamePhase::Ended {
                    break;
                }
            }

            let snapshot = session.snapshot();
            if session.phase() == GamePhase::Playing {
                log::warn!("Session {} still alive after {} ticks, leaving", n, MAX_TICKS);
                session.leave();
            }
            let milestone = Milestone::for_score(snapshot.score);
            log::info!(
                "Session {}: score {} ({}, {} tier-ups) in {:.1}s, best {}{}",
                n,
                snapshot.score,
                difficulty_badge(snapshot.tier),
                tiers_reached,
                snapshot.elapsed_ms / 1000.0,
                session.best_score(),
                if session.is_new_best() {
                    format!(" - new best, {}", milestone.label())
                } else {
                    String::new()
                }
            );
        }
    }

}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("Deep Dive (native) starting...");
    log::info!("Native mode plays headless - run with `trunk serve` for the web version");

    let options = headless::Options::parse();
    headless::run(&options);
}
