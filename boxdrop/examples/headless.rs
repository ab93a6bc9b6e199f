// Copyright 2025 John Brosnihan
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
//! Headless example: drop a few boxes without opening a window
//!
//! Scripts three clicks and three seconds of timer ticks, prints every
//! contact as it happens, then shuts down with Escape.

use boxdrop::config::{EngineConfig, ScreenMode};
use boxdrop::engine::Engine;
use boxdrop::input::Key;
use boxdrop::platform::headless::{HeadlessPlatform, ScriptedEvent};
use boxdrop::world::{CollisionTag, ContactEvent, ContactListener, ContactPhase};

// Prints landings and separations as they happen
struct Announcer;

impl ContactListener for Announcer {
    fn on_contact(&mut self, event: &ContactEvent) {
        let what = match event.phase {
            ContactPhase::Began => "touched",
            ContactPhase::Ended => "separated from",
        };
        let landed = event.involves(CollisionTag::Dynamic, CollisionTag::Static);
        println!(
            "  - {} {} {}{}",
            event.first,
            what,
            event.second,
            if landed && event.phase == ContactPhase::Began { " (landed)" } else { "" }
        );
    }

    fn name(&self) -> &str {
        "Announcer"
    }
}

fn main() {
    println!("boxdrop - Headless Example");
    println!("==========================\n");

    let config = EngineConfig::default();
    let fps = config.frames_per_second;

    let mut platform = HeadlessPlatform::new();
    platform
        .click(320.0, 200.0)
        .click(640.0, 100.0)
        .click(650.0, 300.0)
        .ticks(3 * fps)
        .push(ScriptedEvent::Key(Key::Escape));

    let mut engine = Engine::new(platform, config).with_listener(Box::new(Announcer));
    if let Err(err) = engine.configure(ScreenMode::Windowed) {
        eprintln!("Game engine failed: {}", err);
        std::process::exit(1);
    }

    println!("Dropping 3 boxes for {} frames:", 3 * fps);
    match engine.run() {
        Ok(summary) => {
            println!("\nRun finished in state '{}'", engine.state());
            println!("  Frames rendered: {}", summary.frames);
            println!("  Timer ticks:     {}", summary.ticks);
            println!("  Bodies released: {}", summary.bodies_released);
        }
        Err(err) => {
            eprintln!("Game engine failed: {}", err);
            std::process::exit(1);
        }
    }
}
