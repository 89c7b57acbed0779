//! Question pools compiled into the binary.

pub(crate) type Pool = (&'static str, &'static str, &'static [&'static str]);

pub(crate) const POOLS: &[Pool] = &[
    (
        "JavaScript",
        "beginner",
        &[
            "What is the difference between let, const, and var?",
            "Explain what a closure is in JavaScript",
            "What is event bubbling and how does it work?",
        ],
    ),
    (
        "JavaScript",
        "intermediate",
        &[
            "How does the 'this' keyword work in different contexts?",
            "Explain the concept of promises and async/await",
            "What are higher-order functions and provide an example",
        ],
    ),
    (
        "JavaScript",
        "advanced",
        &[
            "Explain the JavaScript event loop and how it handles asynchronous operations",
            "What are JavaScript generators and how are they different from async/await?",
            "How does JavaScript's prototypal inheritance work?",
        ],
    ),
    (
        "React",
        "beginner",
        &[
            "What are the key differences between functional and class components?",
            "What is JSX and how is it different from HTML?",
            "Explain the purpose of state and props in React",
        ],
    ),
    (
        "React",
        "intermediate",
        &[
            "How does React's virtual DOM improve performance?",
            "What are React hooks and why were they introduced?",
            "Explain the component lifecycle in functional components",
        ],
    ),
    (
        "React",
        "advanced",
        &[
            "How would you optimize a React application's performance?",
            "Explain how React's reconciliation algorithm works",
            "What are React error boundaries and how do they work?",
        ],
    ),
    (
        "Python",
        "beginner",
        &[
            "What is the difference between a list and a tuple in Python?",
            "How do you handle exceptions in Python?",
            "What are Python's built-in data types?",
        ],
    ),
    (
        "Python",
        "intermediate",
        &[
            "What are decorators in Python and how do you write one?",
            "Explain the difference between a generator and a list comprehension",
            "How does Python manage memory and garbage collection?",
        ],
    ),
    (
        "Python",
        "advanced",
        &[
            "What is the Global Interpreter Lock and how does it affect concurrency?",
            "Explain metaclasses and when you would use one",
            "How does asyncio schedule coroutines?",
        ],
    ),
    (
        "Node.js",
        "beginner",
        &[
            "What is Node.js and why is it single-threaded?",
            "What is npm and what is package.json used for?",
            "How do you read a file asynchronously in Node.js?",
        ],
    ),
    (
        "Node.js",
        "intermediate",
        &[
            "Explain middleware in Express",
            "What are streams in Node.js and when would you use them?",
            "How do you handle errors in asynchronous Node.js code?",
        ],
    ),
    (
        "Node.js",
        "advanced",
        &[
            "How does the Node.js event loop differ from the browser's?",
            "When would you use worker threads or the cluster module?",
            "How would you find and fix a memory leak in a Node.js service?",
        ],
    ),
    (
        "AI/ML",
        "beginner",
        &[
            "What is the difference between supervised and unsupervised learning?",
            "What is overfitting and how can you prevent it?",
            "Explain the difference between classification and regression",
        ],
    ),
    (
        "AI/ML",
        "intermediate",
        &[
            "Explain the bias-variance tradeoff",
            "How does gradient descent work?",
            "What evaluation metrics would you use for an imbalanced dataset?",
        ],
    ),
    (
        "AI/ML",
        "advanced",
        &[
            "Explain the attention mechanism in transformer models",
            "How would you deploy and monitor a model in production?",
            "What is transfer learning and when does it help?",
        ],
    ),
    (
        "DevOps",
        "beginner",
        &[
            "What is continuous integration and continuous delivery?",
            "What is the difference between a container and a virtual machine?",
            "Why is version control important in DevOps?",
        ],
    ),
    (
        "DevOps",
        "intermediate",
        &[
            "How does Kubernetes schedule and scale pods?",
            "What is infrastructure as code and which tools have you used for it?",
            "How would you design a blue-green deployment?",
        ],
    ),
    (
        "DevOps",
        "advanced",
        &[
            "How would you define SLOs and error budgets for a service?",
            "How do you manage secrets across multiple environments?",
            "Walk through how you would debug a production outage",
        ],
    ),
    (
        "Cybersecurity",
        "beginner",
        &[
            "What is the CIA triad?",
            "What is the difference between symmetric and asymmetric encryption?",
            "What is phishing and how can users protect themselves?",
        ],
    ),
    (
        "Cybersecurity",
        "intermediate",
        &[
            "Explain SQL injection and how to prevent it",
            "What is cross-site scripting and what are its main types?",
            "How does TLS establish a secure connection?",
        ],
    ),
    (
        "Cybersecurity",
        "advanced",
        &[
            "How would you design a zero trust network architecture?",
            "Walk through your incident response process for a data breach",
            "How do you threat model a new web application?",
        ],
    ),
];
