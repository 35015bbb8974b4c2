//! Command implementations: provider wiring and output handling.

use sage_core::config::SageConfig;
use sage_core::providers::create_provider;
use sage_core::{
    Agent, AgentRequest, FallbackChat, Message, QueryExpander, ResearchEngine, StreamEvent,
    Summarizer, ToolFlags,
};
use sage_tools::sinks::SinkRegistry;
use sage_tools::{create_image_provider, create_search_provider};
use std::io::Write;
use tokio::sync::mpsc;
use tracing::error;

/// Build the fully wired agent from configuration.
///
/// Every collaborator is constructed here and passed in; nothing in the
/// core reaches for ambient global state.
fn build_agent(config: &SageConfig, model_override: Option<String>) -> Agent {
    let provider = create_provider(&config.llm);
    let chat = FallbackChat::new(
        provider,
        model_override.or_else(|| config.llm.model.clone()),
    );

    let search = create_search_provider(&config.search);
    let image = create_image_provider(&config.image);
    let summarizer = Summarizer::new(chat.clone());

    // The LLM-backed expander only makes sense with a real credential;
    // without one, expansion stays deterministic and local.
    let expander = if config.llm.has_credential() {
        QueryExpander::with_chat(chat.clone())
    } else {
        QueryExpander::heuristic()
    };
    let research = ResearchEngine::new(expander, search.clone(), summarizer.clone());

    Agent::new(research, search, summarizer, image, chat, &config.llm)
}

pub async fn run_agent(
    config: &SageConfig,
    prompt: &str,
    research: bool,
    search: bool,
    summarize: bool,
    image: bool,
    model: Option<String>,
) -> anyhow::Result<()> {
    let agent = build_agent(config, model);
    let request = AgentRequest {
        messages: vec![Message::user(prompt)],
        tools: ToolFlags {
            web_search: search,
            summarization: summarize,
            image_generation: image,
            deep_research: research,
        },
        files: Vec::new(),
    };

    match agent.run(request).await {
        Ok(reply) => {
            println!("{reply}");
            Ok(())
        }
        Err(e) => {
            error!(error = %e, "Agent run failed");
            anyhow::bail!("Agent execution failed")
        }
    }
}

pub async fn chat(config: &SageConfig, prompt: &str, model: Option<String>) -> anyhow::Result<()> {
    let agent = build_agent(config, model);
    let messages = vec![Message::user(prompt)];

    if !config.llm.use_streaming {
        let response = agent.chat(messages).await?;
        println!("{}", response.message.content);
        return Ok(());
    }

    let (tx, mut rx) = mpsc::channel::<StreamEvent>(64);
    let printer = tokio::spawn(async move {
        let mut stdout = std::io::stdout();
        while let Some(event) = rx.recv().await {
            match event {
                StreamEvent::Token(token) => {
                    print!("{token}");
                    let _ = stdout.flush();
                }
                StreamEvent::Done { .. } => break,
                StreamEvent::Error(e) => {
                    eprintln!("\nstream error: {e}");
                    break;
                }
            }
        }
    });

    let result = agent.chat_streaming(messages, tx).await;
    printer.await.ok();
    println!();
    result?;
    Ok(())
}

pub async fn send(config: &SageConfig, app: &str, title: &str, body: &str) -> anyhow::Result<()> {
    let registry = SinkRegistry::from_config(&config.sinks);
    let payload = sage_core::SinkPayload::new(title, body);
    let ack = registry.deliver(app, &payload).await?;
    match ack.reference {
        Some(reference) => println!("Delivered to {} ({reference})", ack.sink),
        None => println!("Delivered to {}", ack.sink),
    }
    Ok(())
}
