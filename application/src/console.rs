//! Line-oriented [`Console`] driving the [`Service`].

use std::{
    io::{self, Write},
    rc::Rc,
};

use common::Handler as _;
use secrecy::SecretString;
use service::{
    command,
    gate::{Route, Status},
    l10n::{Locale, Localize, Text},
    loader::{self, Loader},
    query::profile,
};
use tokio::{
    io::{AsyncBufRead, AsyncBufReadExt as _},
    sync::mpsc,
};
use tracing as log;

use crate::{AsError as _, Gate, Service};

/// Screen shown by the [`Console`].
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Screen {
    /// Shown until the session gate decides.
    Splash,

    /// Login form.
    Login,

    /// Registration form.
    Register,

    /// Dashboard greeting the signed in user.
    Home,

    /// Paginated list of students.
    Students,

    /// Profile of the signed in user.
    Profile,
}

impl From<Route> for Screen {
    fn from(route: Route) -> Self {
        match route {
            Route::Login => Self::Login,
            Route::Home => Self::Home,
        }
    }
}

/// Whether the [`Console`] should keep reading input.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum Flow {
    /// Keep reading.
    Continue,

    /// Stop reading.
    Quit,
}

/// Fixed text shown by the [`Console`] only.
#[derive(Clone, Copy, Debug)]
enum Prompt {
    /// Title of the [`Screen::Login`].
    Welcome,

    /// Hint of the [`Screen::Login`].
    LoginHint,

    /// Title of the [`Screen::Register`].
    Register,

    /// Hint of the [`Screen::Register`].
    RegisterHint,

    /// Greeting on the [`Screen::Home`].
    Greeting,

    /// Title of the [`Screen::Students`].
    Students,

    /// Hint to load more students.
    LoadMore,

    /// Title of the [`Screen::Profile`].
    Profile,

    /// Shown when an area command is used while signed out.
    SignInFirst,

    /// Shown when an auth command is used while signed in.
    SignOutFirst,

    /// Shown on an unknown command.
    Unknown,
}

impl Localize for Prompt {
    fn localize(&self, locale: Locale) -> &'static str {
        match (self, locale) {
            (Self::Welcome, Locale::En) => "Welcome!",
            (Self::Welcome, Locale::Id) => "Selamat Datang!",
            (Self::LoginHint, Locale::En) => {
                "login <email> <password>, or `register` to sign up"
            }
            (Self::LoginHint, Locale::Id) => {
                "login <email> <password>, atau `register` untuk daftar"
            }
            (Self::Register, Locale::En) => "Create an account",
            (Self::Register, Locale::Id) => "Buat Akun",
            (Self::RegisterHint, _) => {
                "register <name> <email> <password> <confirmation>"
            }
            (Self::Greeting, Locale::En) => "Hello,",
            (Self::Greeting, Locale::Id) => "Halo,",
            (Self::Students, Locale::En) => "Students",
            (Self::Students, Locale::Id) => "Data Mahasiswa",
            (Self::LoadMore, Locale::En) => "`more` to load more",
            (Self::LoadMore, Locale::Id) => "`more` untuk muat lebih banyak",
            (Self::Profile, _) => "Profile",
            (Self::SignInFirst, Locale::En) => "Log in first.",
            (Self::SignInFirst, Locale::Id) => "Silakan login dulu.",
            (Self::SignOutFirst, Locale::En) => "Log out first.",
            (Self::SignOutFirst, Locale::Id) => "Silakan logout dulu.",
            (Self::Unknown, Locale::En) => "Unknown command, try `help`.",
            (Self::Unknown, Locale::Id) => {
                "Perintah tidak dikenal, coba `help`."
            }
        }
    }
}

/// Line-oriented console client.
#[derive(Debug)]
pub struct Console<W> {
    /// [`Service`] to drive.
    service: Service,

    /// Session [`Gate`] deciding the area the user is in.
    gate: Rc<Gate>,

    /// [`Locale`] of the shown texts.
    locale: Locale,

    /// Currently shown [`Screen`].
    screen: Screen,

    /// [`Loader`] of the [`Screen::Students`], while it's shown.
    loader: Option<Loader<Service>>,

    /// Output to write to.
    out: W,
}

impl<W: Write> Console<W> {
    /// Creates a new [`Console`] showing the [`Screen::Splash`].
    #[must_use]
    pub fn new(
        service: Service,
        gate: Rc<Gate>,
        locale: Locale,
        out: W,
    ) -> Self {
        Self {
            service,
            gate,
            locale,
            screen: Screen::Splash,
            loader: None,
            out,
        }
    }

    /// Returns the currently shown [`Screen`].
    #[must_use]
    pub fn screen(&self) -> Screen {
        self.screen
    }

    /// Runs this [`Console`] until the `input` ends or the user quits,
    /// following the [`Route`]s of the session gate meanwhile.
    ///
    /// # Errors
    ///
    /// If reading the `input` or writing the output fails.
    pub async fn run<R>(
        mut self,
        input: R,
        mut routes: mpsc::UnboundedReceiver<Route>,
    ) -> io::Result<()>
    where
        R: AsyncBufRead + Unpin,
    {
        self.render().await?;

        let mut lines = input.lines();
        loop {
            tokio::select! {
                Some(route) = routes.recv() => self.navigate(route).await?,
                line = lines.next_line() => {
                    let Some(line) = line? else {
                        break;
                    };
                    if self.handle(&line).await? == Flow::Quit {
                        break;
                    }
                }
            }
        }

        self.leave();
        Ok(())
    }

    /// Shows the [`Screen`] of the provided [`Route`].
    ///
    /// # Errors
    ///
    /// If writing the output fails.
    pub async fn navigate(&mut self, route: Route) -> io::Result<()> {
        self.show(route.into()).await
    }

    /// Executes the command entered as a `line`.
    async fn handle(&mut self, line: &str) -> io::Result<Flow> {
        let mut words = line.split_whitespace();
        let Some(command) = words.next() else {
            return Ok(Flow::Continue);
        };
        let args = words.collect::<Vec<_>>();
        let signed_in = self.gate.current() == Status::Authenticated;

        match (command, signed_in) {
            ("quit" | "exit", _) => return Ok(Flow::Quit),
            ("help", _) => self.help()?,
            ("login", false) => self.sign_in(&args).await?,
            ("register", false) if args.is_empty() => {
                self.show(Screen::Register).await?;
            }
            ("register", false) => self.sign_up(&args).await?,
            ("back", false) => self.show(Screen::Login).await?,
            ("home", true) => self.show(Screen::Home).await?,
            ("students", true) => self.show(Screen::Students).await?,
            ("profile", true) => self.show(Screen::Profile).await?,
            ("more", true) => self.load_more().await?,
            ("refresh", true) => self.refresh().await?,
            ("logout", true) => self.sign_out().await?,
            ("login" | "register" | "back", true) => {
                self.say(Prompt::SignOutFirst)?;
            }
            (
                "home" | "students" | "profile" | "more" | "refresh"
                | "logout",
                false,
            ) => self.say(Prompt::SignInFirst)?,
            _ => self.say(Prompt::Unknown)?,
        }
        Ok(Flow::Continue)
    }

    /// Replaces the shown [`Screen`].
    async fn show(&mut self, screen: Screen) -> io::Result<()> {
        if self.screen == Screen::Students && screen != Screen::Students {
            self.leave();
        }
        self.screen = screen;
        self.render().await
    }

    /// Detaches the [`Loader`] of the [`Screen::Students`], if any.
    fn leave(&mut self) {
        if let Some(loader) = self.loader.take() {
            loader.detach();
        }
    }

    /// Renders the shown [`Screen`].
    async fn render(&mut self) -> io::Result<()> {
        let locale = self.locale;
        match self.screen {
            Screen::Splash => self.say(Text::Loading),
            Screen::Login => {
                self.say(Prompt::Welcome)?;
                self.say(Prompt::LoginHint)
            }
            Screen::Register => {
                self.say(Prompt::Register)?;
                self.say(Prompt::RegisterHint)
            }
            Screen::Home => {
                let profile = self.profile().await;
                writeln!(
                    self.out,
                    "{} {}",
                    Prompt::Greeting.localize(locale),
                    profile.greeting(locale),
                )
            }
            Screen::Profile => {
                let profile = self.profile().await;
                self.say(Prompt::Profile)?;
                writeln!(self.out, "{}", profile.display_name(locale))?;
                writeln!(self.out, "{}", profile.email.unwrap_or_default())
            }
            Screen::Students => {
                self.say(Prompt::Students)?;
                let loader = self.loader.insert(Loader::new(
                    self.service.clone(),
                    self.service.config().page_size,
                ));
                let outcome = loader.load_initial().await;
                self.report(outcome)
            }
        }
    }

    /// Reads the cached profile of the signed in user.
    async fn profile(&self) -> profile::Profile {
        self.service
            .execute(profile::Cached)
            .await
            .unwrap_or_else(|e| {
                log::warn!("failed to read cached profile: {e}");
                profile::Profile::default()
            })
    }

    /// Loads more students on the [`Screen::Students`].
    async fn load_more(&mut self) -> io::Result<()> {
        if self.screen != Screen::Students {
            return self.show(Screen::Students).await;
        }
        let Some(loader) = &self.loader else {
            return Ok(());
        };
        let outcome = loader.load_more().await;
        self.report(outcome)
    }

    /// Reloads the students on the [`Screen::Students`].
    async fn refresh(&mut self) -> io::Result<()> {
        if self.screen != Screen::Students {
            return self.show(Screen::Students).await;
        }
        let Some(loader) = &self.loader else {
            return Ok(());
        };
        let outcome = loader.refresh().await;
        self.report(outcome)
    }

    /// Prints the students newly loaded by a [`Loader`] operation.
    fn report(
        &mut self,
        outcome: Result<loader::Outcome, tracerr::Traced<loader::Error>>,
    ) -> io::Result<()> {
        let locale = self.locale;
        let Some(loader) = &self.loader else {
            return Ok(());
        };
        let state = loader.state();

        let fetched = match outcome {
            Ok(loader::Outcome::Loaded { fetched, .. }) => fetched,
            Ok(loader::Outcome::Skipped(_) | loader::Outcome::Discarded) => 0,
            Err(e) => {
                log::error!("failed to load students: {e}");
                return writeln!(self.out, "{}", e.as_error(locale).message);
            }
        };

        let first = state.records.len().saturating_sub(fetched);
        for (n, record) in state.records.iter().enumerate().skip(first) {
            write!(
                self.out,
                "{:>3}. [{}] {} ({})",
                n + 1,
                record.name.initial().unwrap_or('?'),
                record.name,
                record.external_key,
            )?;
            if let Some(category) = &record.category {
                write!(self.out, " {category}")?;
            }
            writeln!(self.out)?;
        }

        match state.footer() {
            Some(text) => self.say(text),
            None => self.say(Prompt::LoadMore),
        }
    }

    /// Signs in with the provided `args`.
    async fn sign_in(&mut self, args: &[&str]) -> io::Result<()> {
        let (email, password) = match args {
            [email, password] => (*email, *password),
            [email] => (*email, ""),
            _ => ("", ""),
        };

        let res = self
            .service
            .execute(command::SignIn {
                email: email.to_owned(),
                password: SecretString::from(password.to_owned()),
            })
            .await;
        match res {
            Ok(session) => {
                _ = self.gate.on_session_changed(Some(session)).await;
            }
            Err(e) => {
                log::debug!("failed to sign in: {e}");
                writeln!(self.out, "{}", e.as_error(self.locale).message)?;
            }
        }
        Ok(())
    }

    /// Signs up with the provided `args`.
    async fn sign_up(&mut self, args: &[&str]) -> io::Result<()> {
        let (name, email, password, confirmation) = match args {
            [name @ .., email, password, confirmation] => {
                (name.join(" "), *email, *password, *confirmation)
            }
            _ => (String::new(), "", "", ""),
        };

        let res = self
            .service
            .execute(command::SignUp {
                name,
                email: email.to_owned(),
                password: SecretString::from(password.to_owned()),
                confirmation: SecretString::from(confirmation.to_owned()),
            })
            .await;
        match res {
            Ok(session) => {
                _ = self.gate.on_session_changed(Some(session)).await;
            }
            Err(e) => {
                log::debug!("failed to sign up: {e}");
                writeln!(self.out, "{}", e.as_error(self.locale).message)?;
            }
        }
        Ok(())
    }

    /// Signs out the current user.
    async fn sign_out(&mut self) -> io::Result<()> {
        let res = self.service.execute(command::SignOut).await;

        // Local session is cleared even if the provider has failed.
        _ = self.gate.on_session_changed(None).await;

        if let Err(e) = res {
            log::error!("failed to sign out: {e}");
            writeln!(self.out, "{}", e.as_error(self.locale).message)?;
        }
        Ok(())
    }

    /// Prints the available commands.
    fn help(&mut self) -> io::Result<()> {
        writeln!(
            self.out,
            "login <email> <password>\n\
             register [<name> <email> <password> <confirmation>]\n\
             back | home | students | more | refresh | profile | logout\n\
             quit",
        )
    }

    /// Prints the provided text.
    fn say(&mut self, text: impl Localize) -> io::Result<()> {
        writeln!(self.out, "{}", text.localize(self.locale))
    }
}
