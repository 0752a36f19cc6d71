//! One interaction of the voice assistant: interpret the query, fetch the
//! matching weather data and render the sentence to speak.

use chrono::{Datelike, NaiveDate, NaiveDateTime, Weekday};

use crate::{
    city::extract_city,
    error::QueryError,
    model::{WeatherReport, WeatherRequest, WeatherSample},
    provider::WeatherProvider,
    select::select_nearest,
    speech::{SpeechInput, SpeechOutput},
    time::{self, TimeExpression},
};

/// What the assistant understood from a query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Interpretation {
    pub city: String,
    pub time: TimeExpression,
    /// True when the target date lies strictly after today.
    pub is_future: bool,
}

#[derive(Debug)]
pub struct Assistant {
    provider: Box<dyn WeatherProvider>,
}

impl Assistant {
    pub fn new(provider: Box<dyn WeatherProvider>) -> Self {
        Self { provider }
    }

    /// Extract the city and target moment from `text` without any network call.
    pub fn interpret(text: &str, now: NaiveDateTime) -> Result<Interpretation, QueryError> {
        if text.trim().is_empty() {
            return Err(QueryError::NoSpeech);
        }

        let city = extract_city(text).ok_or(QueryError::NoCity)?;
        let time = time::resolve(text, now);

        Ok(Interpretation {
            city,
            time,
            is_future: time.date > now.date(),
        })
    }

    /// Answer `text` as of `now`, returning the sentence to speak.
    pub async fn handle(&self, text: &str, now: NaiveDateTime) -> Result<String, QueryError> {
        let query = Self::interpret(text, now)?;
        let target = query.time.instant();

        tracing::info!(city = %query.city, %target, future = query.is_future, "Interpreted query");

        let request = if query.is_future {
            WeatherRequest::forecast(query.city.as_str())
        } else {
            WeatherRequest::current(query.city.as_str())
        };

        let report = self.provider.fetch(&request).await.inspect_err(|e| {
            tracing::warn!(city = %query.city, error = %e, "Weather provider failed");
        })?;

        let sample = match report {
            WeatherReport::Current(sample) => sample,
            WeatherReport::Forecast(series) => select_nearest(&series, target)
                .map(|entry| entry.sample.clone())
                .ok_or(QueryError::NoForecastEntry(target))?,
        };

        let when = query
            .is_future
            .then(|| describe_when(query.time.date, now.date()));

        Ok(render_sentence(&query.city, &sample, when.as_deref()))
    }

    /// Run one full interaction: listen, answer, speak.
    ///
    /// Whatever the outcome, something is spoken: the weather sentence or an
    /// apology for the failure category.
    pub async fn respond(
        &self,
        input: &mut dyn SpeechInput,
        output: &dyn SpeechOutput,
        now: NaiveDateTime,
    ) -> Result<String, QueryError> {
        let outcome = match input.listen() {
            Ok(text) => {
                tracing::debug!(%text, "Heard query");
                self.handle(&text, now).await
            }
            Err(e) => {
                tracing::warn!(error = %e, "No usable speech input");
                Err(e.into())
            }
        };

        match &outcome {
            Ok(sentence) => output.speak(sentence),
            Err(e) => output.speak(e.apology()),
        }

        outcome
    }
}

/// Spoken qualifier for a future date.
pub fn describe_when(target: NaiveDate, today: NaiveDate) -> String {
    match (target - today).num_days() {
        1 => "tomorrow".to_string(),
        2 => "the day after tomorrow".to_string(),
        _ => format!("on {}", weekday_name(target.weekday())),
    }
}

/// `when` is `None` for current conditions.
pub fn render_sentence(city: &str, sample: &WeatherSample, when: Option<&str>) -> String {
    let conditions = format!(
        "{}, with {:.1} degrees and {} percent humidity",
        sample.description, sample.temperature, sample.humidity
    );

    match when {
        None => format!("The weather in {city} is {conditions}."),
        Some(when) => format!("The weather in {city} {when} will be {conditions}."),
    }
}

fn weekday_name(weekday: Weekday) -> &'static str {
    match weekday {
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
        Weekday::Sun => "Sunday",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        error::ProviderError,
        model::{ForecastEntry, ReportKind},
        speech::InputError,
    };
    use async_trait::async_trait;
    use std::{
        cell::RefCell,
        sync::{Arc, Mutex},
    };

    /// In-memory provider recording which kind of report was asked for.
    #[derive(Debug, Default)]
    struct FakeProvider {
        current: Option<WeatherSample>,
        forecast: Option<Vec<ForecastEntry>>,
        calls: Arc<Mutex<Vec<(String, ReportKind)>>>,
    }

    #[async_trait]
    impl WeatherProvider for FakeProvider {
        async fn fetch(&self, request: &WeatherRequest) -> Result<WeatherReport, ProviderError> {
            self.calls.lock().unwrap().push((request.city.clone(), request.kind));

            let missing = || ProviderError::Status { status: 404, message: "city not found".into() };
            match request.kind {
                ReportKind::Current => self.current.clone().map(WeatherReport::Current).ok_or_else(missing),
                ReportKind::Forecast => self.forecast.clone().map(WeatherReport::Forecast).ok_or_else(missing),
            }
        }
    }

    struct ScriptedInput(Option<Result<String, InputError>>);

    impl SpeechInput for ScriptedInput {
        fn listen(&mut self) -> Result<String, InputError> {
            self.0.take().unwrap_or(Err(InputError::NoSpeech))
        }
    }

    #[derive(Default)]
    struct RecordingOutput(RefCell<Vec<String>>);

    impl SpeechOutput for RecordingOutput {
        fn speak(&self, sentence: &str) {
            self.0.borrow_mut().push(sentence.to_string());
        }
    }

    fn sample(description: &str, temperature: f64, humidity: u8) -> WeatherSample {
        WeatherSample { temperature, humidity, description: description.to_string() }
    }

    fn at(day: u32, hour: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, day)
            .unwrap()
            .and_hms_opt(hour, 0, 0)
            .unwrap()
    }

    /// Three-hourly series over 2024-03-02..=2024-03-06, temperature = hour.
    fn forecast_series() -> Vec<ForecastEntry> {
        (2..=6)
            .flat_map(|day| (0..8).map(move |slot| (day, slot * 3)))
            .map(|(day, hour)| ForecastEntry {
                timestamp: at(day, hour),
                sample: sample(&format!("clouds {day}/{hour}"), f64::from(hour), 60),
            })
            .collect()
    }

    fn assistant_with(provider: FakeProvider) -> (Assistant, Arc<Mutex<Vec<(String, ReportKind)>>>) {
        let calls = provider.calls.clone();
        (Assistant::new(Box::new(provider)), calls)
    }

    fn full_provider() -> FakeProvider {
        FakeProvider {
            current: Some(sample("clear sky", 7.456, 41)),
            forecast: Some(forecast_series()),
            ..FakeProvider::default()
        }
    }

    #[tokio::test]
    async fn current_weather_now() {
        let (assistant, calls) = assistant_with(full_provider());

        let sentence = assistant.handle("what's the weather in Seoul now", at(1, 10)).await.unwrap();

        assert_eq!(
            sentence,
            "The weather in Seoul is clear sky, with 7.5 degrees and 41 percent humidity."
        );
        assert_eq!(*calls.lock().unwrap(), vec![("Seoul".to_string(), ReportKind::Current)]);
    }

    #[tokio::test]
    async fn todays_weekday_uses_current_weather() {
        let query = Assistant::interpret("weather in Incheon on Friday", at(1, 10)).unwrap();
        assert_eq!(query.city, "Incheon");
        assert_eq!(query.time.date, at(1, 0).date());
        assert!(!query.is_future);

        let (assistant, calls) = assistant_with(full_provider());
        assistant.handle("weather in Incheon on Friday", at(1, 10)).await.unwrap();
        assert_eq!(calls.lock().unwrap()[0].1, ReportKind::Current);
    }

    #[tokio::test]
    async fn tonight_without_in() {
        let query = Assistant::interpret("tonight Seoul", at(1, 8)).unwrap();
        assert_eq!(query.city, "Seoul");
        assert_eq!(query.time.hour, 18);
        assert!(!query.is_future);

        let (assistant, calls) = assistant_with(full_provider());
        let sentence = assistant.handle("tonight Seoul", at(1, 8)).await.unwrap();
        assert!(sentence.starts_with("The weather in Seoul is "));
        assert_eq!(calls.lock().unwrap()[0].1, ReportKind::Current);
    }

    #[tokio::test]
    async fn tomorrow_morning_uses_nearest_forecast_entry() {
        let (assistant, calls) = assistant_with(full_provider());

        let sentence = assistant.handle("incheon tomorrow morning", at(1, 10)).await.unwrap();

        assert_eq!(
            sentence,
            "The weather in Incheon tomorrow will be clouds 2/9, with 9.0 degrees and 60 percent humidity."
        );
        assert_eq!(*calls.lock().unwrap(), vec![("Incheon".to_string(), ReportKind::Forecast)]);
    }

    #[tokio::test]
    async fn day_after_tomorrow_and_weekday_qualifiers() {
        let (assistant, _) = assistant_with(full_provider());

        let sentence = assistant
            .handle("busan day after tomorrow evening", at(1, 10))
            .await
            .unwrap();
        assert!(sentence.starts_with("The weather in Busan the day after tomorrow will be clouds 3/18"));

        // Friday -> Monday, three days ahead.
        let sentence = assistant.handle("weather in daegu on monday", at(1, 10)).await.unwrap();
        assert!(sentence.starts_with("The weather in Daegu on Monday will be clouds 4/12"));
    }

    #[tokio::test]
    async fn empty_text_is_no_speech() {
        let (assistant, calls) = assistant_with(full_provider());
        let err = assistant.handle("   ", at(1, 10)).await.unwrap_err();

        assert!(matches!(err, QueryError::NoSpeech));
        assert!(calls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn no_city_and_exit_commands() {
        let (assistant, calls) = assistant_with(full_provider());

        let err = assistant.handle("tomorrow morning", at(1, 10)).await.unwrap_err();
        assert!(matches!(err, QueryError::NoCity));

        let err = assistant.handle("exit", at(1, 10)).await.unwrap_err();
        assert!(matches!(err, QueryError::NoCity));

        assert!(calls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn provider_failure_is_terminal() {
        let (assistant, calls) = assistant_with(FakeProvider::default());

        let err = assistant.handle("seoul now", at(1, 10)).await.unwrap_err();
        assert!(matches!(err, QueryError::Provider(ProviderError::Status { status: 404, .. })));

        let err = assistant.handle("seoul tomorrow", at(1, 10)).await.unwrap_err();
        assert!(matches!(err, QueryError::Provider(_)));

        assert_eq!(calls.lock().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn empty_forecast_has_no_suitable_entry() {
        let provider = FakeProvider { forecast: Some(Vec::new()), ..FakeProvider::default() };
        let (assistant, _) = assistant_with(provider);

        let err = assistant.handle("seoul tomorrow", at(1, 10)).await.unwrap_err();
        assert!(matches!(err, QueryError::NoForecastEntry(target) if target == at(2, 12)));
    }

    #[tokio::test]
    async fn respond_speaks_sentence() {
        let (assistant, _) = assistant_with(full_provider());
        let mut input = ScriptedInput(Some(Ok("weather in seoul".into())));
        let output = RecordingOutput::default();

        let sentence = assistant.respond(&mut input, &output, at(1, 10)).await.unwrap();

        assert_eq!(*output.0.borrow(), vec![sentence]);
    }

    #[tokio::test]
    async fn respond_speaks_apology_on_failure() {
        let (assistant, calls) = assistant_with(full_provider());
        let mut input = ScriptedInput(Some(Err(InputError::Unintelligible)));
        let output = RecordingOutput::default();

        let err = assistant.respond(&mut input, &output, at(1, 10)).await.unwrap_err();

        assert!(matches!(err, QueryError::NoSpeech));
        assert_eq!(*output.0.borrow(), vec!["Sorry, I did not catch that.".to_string()]);
        assert!(calls.lock().unwrap().is_empty());
    }

    #[test]
    fn describe_when_qualifiers() {
        let today = at(1, 0).date();
        assert_eq!(describe_when(at(2, 0).date(), today), "tomorrow");
        assert_eq!(describe_when(at(3, 0).date(), today), "the day after tomorrow");
        assert_eq!(describe_when(at(5, 0).date(), today), "on Tuesday");
    }

    #[test]
    fn render_rounds_temperature_to_one_decimal() {
        let s = sample("light rain", -2.04, 93);
        assert_eq!(
            render_sentence("Seoul", &s, None),
            "The weather in Seoul is light rain, with -2.0 degrees and 93 percent humidity."
        );
        assert_eq!(
            render_sentence("Seoul", &s, Some("tomorrow")),
            "The weather in Seoul tomorrow will be light rain, with -2.0 degrees and 93 percent humidity."
        );
    }
}
