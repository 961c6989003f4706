//! Prompt templates sent to the language model.

use crate::domain::business::or_not_specified;
use crate::domain::{Answers, BusinessContext};

fn business_context_block(context: &BusinessContext) -> String {
    format!(
        r#"Business Context:
- Mission Statement/Operating Model: {}
- Company Name: {}
- Industry: {}
- Business Size: {}"#,
        context.mission_statement(),
        or_not_specified(context.company_name()),
        or_not_specified(context.industry()),
        or_not_specified(context.business_size()),
    )
}

/// Prompt asking for clarifying questions about the business.
pub fn questions_prompt(context: &BusinessContext) -> String {
    format!(
        r#"You are ChatOPT, an expert in API design and software architecture. Your task is to ask follow-up questions to gather more information about the business before generating an API masterplan.

{}

Based on this information, generate 5-7 specific questions that will help you better understand:
1. The core business processes
2. The users/customers and their needs
3. Existing systems and integrations
4. Data handling requirements
5. Scalability and performance expectations
6. Security and compliance requirements

Format your output as a JSON list of strings containing only the questions, without any introductory text. If no further information is needed, return an empty JSON list."#,
        business_context_block(context)
    )
}

/// Prompt asking for the markdown masterplan plus a JSON array of API specs.
pub fn masterplan_prompt(context: &BusinessContext, answers: Option<&Answers>) -> String {
    let answers_block = answers
        .map(|a| format!("\n\nAdditional Information (answers to follow-up questions):\n{}", a.as_str()))
        .unwrap_or_default();

    format!(
        r#"You are ChatOPT, an expert in API design and software architecture. Based on the business context below, create a comprehensive API masterplan.

{}{}

Generate a markdown OPT (Operating Process Technology) masterplan that includes:

1. Executive Summary: A brief overview of the proposed API architecture.

2. Core API Specifications:
   - For each core business function, define an API with:
     - Name and description
     - Key endpoints (routes, methods, purpose)
     - Data models
     - Whether it should be built in-house or integrated with third-party services (with reasoning)

3. Integration Architecture:
   - How the APIs connect with each other
   - Authentication and security considerations
   - Data flows between systems

4. Implementation Roadmap:
   - Prioritized list of APIs to develop
   - Estimated complexity for each
   - Dependencies between APIs

5. Technical Considerations:
   - Scalability recommendations
   - Security best practices
   - Monitoring and observability suggestions

Use markdown headers (#, ##) for every section.

Format your response with two parts:
1. The full markdown content for the masterplan
2. A structured JSON array of API specifications with the following format for each API:
   ```
   {{
     "name": "API name",
     "description": "Brief description",
     "endpoints": [
       {{
         "path": "/example/path",
         "method": "GET|POST|PUT|DELETE",
         "purpose": "What this endpoint does"
       }}
     ],
     "build_in_house": true|false,
     "reason": "Reasoning for build vs integrate decision"
   }}
   ```

IMPORTANT: Make sure your JSON is valid and properly formatted."#,
        business_context_block(context),
        answers_block
    )
}
