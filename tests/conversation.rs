use std::io::Cursor;
use std::time::Duration;

use jasper::brain::Brain;
use jasper::conversation::Conversation;
use jasper::mic::{Mic, TextMic};
use jasper::opts::Opts;
use jasper::plugin::Plugin;
use jasper::plugins;

#[derive(Default)]
struct LogMic {
    said: Vec<String>,
}

impl Mic for LogMic {
    fn listen(&mut self) -> jasper::Result<Option<Vec<String>>> {
        Ok(None)
    }

    fn active_listen(&mut self, _timeout: Duration) -> jasper::Result<Vec<String>> {
        Ok(Vec::new())
    }

    fn say(&mut self, phrase: &str) -> jasper::Result<()> {
        self.said.push(phrase.to_owned());
        Ok(())
    }
}

struct ThreeLiner;

impl Plugin for ThreeLiner {
    fn name(&self) -> &str {
        "joke"
    }

    fn phrases(&self) -> Vec<String> {
        vec!["JOKE".to_owned()]
    }

    fn is_valid(&self, _text: &str) -> bool {
        true
    }

    fn handle(&self, _text: &str, mic: &mut dyn Mic) -> anyhow::Result<()> {
        mic.say("Knock knock.")?;
        mic.say("Lettuce.")?;
        mic.say("Lettuce in, it's cold out here.")?;
        Ok(())
    }
}

fn builtin_brain(opts: &Opts) -> anyhow::Result<Brain> {
    let mut brain = Brain::for_language(opts)?;
    for plugin in plugins::builtin(opts) {
        brain.add_plugin(plugin);
    }
    Ok(brain)
}

#[test]
fn joke_request_is_handled_with_three_lines() {
    let opts = Opts::default();
    let brain = Brain::new(Vec::new()).with_plugin(ThreeLiner);
    let mut convo = Conversation::new(LogMic::default(), brain, &opts);

    assert!(convo.handle_input(&["Tell me a joke."]));
    assert_eq!(convo.mic().said.len(), 3);
}

#[test]
fn batch_session_with_builtin_plugins() -> anyhow::Result<()> {
    let opts = Opts::default();
    let script = "\
# a short session
Tell me a joke.
who's there
lettuce who
what is the meaning of life

open the pod bay doors
";
    let mic = TextMic::batch(Cursor::new(script), Vec::new(), "JASPER");
    let mut convo = Conversation::new(mic, builtin_brain(&opts)?, &opts);

    convo.run()?;

    let transcript = String::from_utf8(convo.into_mic().into_writer())?;
    assert_eq!(
        transcript,
        "JASPER: Knock knock.\n\
         JASPER: Lettuce.\n\
         JASPER: Lettuce in, it's cold out here.\n\
         JASPER: It's forty two.\n\
         JASPER: I'm sorry, could you repeat that?\n"
    );
    Ok(())
}

#[test]
fn interactive_blank_line_gets_pardon() -> anyhow::Result<()> {
    let opts = Opts::default();
    let mic = TextMic::new(Cursor::new("\n"), Vec::new(), "JASPER");
    let mut convo = Conversation::new(mic, builtin_brain(&opts)?, &opts);

    convo.run()?;

    let transcript = String::from_utf8(convo.into_mic().into_writer())?;
    assert_eq!(transcript, "YOU: JASPER: Pardon?\nYOU: ");
    Ok(())
}
