//! `info` command

pub fn run() {
    println!(
        "# Multi-Agent Company Analysis\n\
         \n\
         ## Status\n\
         - Core infrastructure ready\n\
         - Market data integration (Yahoo Finance)\n\
         - 10-K retrieval (requires indexing)\n\
         - Multi-agent coordination\n\
         \n\
         ## Quick Start\n\
         ```bash\n\
         # Simple analysis (works immediately)\n\
         brief analyze NVDA --simple\n\
         \n\
         # Full analysis (requires 10-K data and OPENAI_API_KEY)\n\
         brief analyze NVDA\n\
         \n\
         # Interactive chat\n\
         brief chat NVDA\n\
         ```"
    );
}
